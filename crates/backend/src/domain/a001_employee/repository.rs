use contracts::domain::a001_employee::{Employee, EmployeeDto};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set};

/// SQLite caps bound parameters per statement; 5 per row keeps chunks well below it
const INSERT_CHUNK_SIZE: usize = 100;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "employees")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub position: String,
    pub salary: f64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for Employee {
    fn from(m: Model) -> Self {
        Employee {
            id: m.id,
            name: m.name,
            age: m.age,
            position: m.position,
            salary: m.salary,
        }
    }
}

fn to_active(employee: &Employee) -> ActiveModel {
    ActiveModel {
        id: Set(employee.id),
        name: Set(employee.name.clone()),
        age: Set(employee.age),
        position: Set(employee.position.clone()),
        salary: Set(employee.salary),
    }
}

pub async fn list_all<C: ConnectionTrait>(conn: &C) -> anyhow::Result<Vec<Employee>> {
    let items = Entity::find()
        .order_by_asc(Column::Id)
        .all(conn)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();
    Ok(items)
}

pub async fn get_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<Option<Employee>> {
    let result = Entity::find_by_id(id).one(conn).await?;
    Ok(result.map(Into::into))
}

pub async fn exists_by_id<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<bool> {
    Ok(get_by_id(conn, id).await?.is_some())
}

/// Inserts with a store-assigned id
pub async fn insert<C: ConnectionTrait>(conn: &C, dto: EmployeeDto) -> anyhow::Result<Employee> {
    let active = ActiveModel {
        id: NotSet,
        name: Set(dto.name),
        age: Set(dto.age),
        position: Set(dto.position),
        salary: Set(dto.salary),
    };
    let model = active.insert(conn).await?;
    Ok(model.into())
}

/// Inserts records that already carry their id, in multi-row statements
pub async fn insert_many<C: ConnectionTrait>(conn: &C, employees: &[Employee]) -> anyhow::Result<()> {
    for chunk in employees.chunks(INSERT_CHUNK_SIZE) {
        Entity::insert_many(chunk.iter().map(to_active))
            .exec(conn)
            .await?;
    }
    Ok(())
}

pub async fn update<C: ConnectionTrait>(conn: &C, employee: &Employee) -> anyhow::Result<Employee> {
    let model = to_active(employee).update(conn).await?;
    Ok(model.into())
}

pub async fn delete<C: ConnectionTrait>(conn: &C, id: i64) -> anyhow::Result<bool> {
    let result = Entity::delete_by_id(id).exec(conn).await?;
    Ok(result.rows_affected > 0)
}

pub async fn delete_many<C: ConnectionTrait>(conn: &C, ids: &[i64]) -> anyhow::Result<u64> {
    if ids.is_empty() {
        return Ok(0);
    }
    let result = Entity::delete_many()
        .filter(Column::Id.is_in(ids.iter().copied()))
        .exec(conn)
        .await?;
    Ok(result.rows_affected)
}
