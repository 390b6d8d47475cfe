use super::repository;
use crate::shared::spreadsheet::{write_table, CellValue};
use contracts::domain::a001_employee::{Employee, EmployeeDto, EMPLOYEE_COLUMNS};
use sea_orm::{DatabaseConnection, TransactionTrait};

/// Creates an employee, the id is assigned by the store
pub async fn create(db: &DatabaseConnection, dto: EmployeeDto) -> anyhow::Result<Employee> {
    repository::insert(db, dto).await
}

/// Replaces every field of an existing employee; `None` when the id is unknown
pub async fn update(
    db: &DatabaseConnection,
    id: i64,
    dto: EmployeeDto,
) -> anyhow::Result<Option<Employee>> {
    let Some(mut aggregate) = repository::get_by_id(db, id).await? else {
        return Ok(None);
    };
    aggregate.update(&dto);
    repository::update(db, &aggregate).await.map(Some)
}

pub async fn delete(db: &DatabaseConnection, id: i64) -> anyhow::Result<bool> {
    repository::delete(db, id).await
}

/// Deletes every listed id, returns how many existed
pub async fn bulk_delete(db: &DatabaseConnection, ids: &[i64]) -> anyhow::Result<u64> {
    repository::delete_many(db, ids).await
}

/// Inserts all records in one transaction: all of them or none
pub async fn bulk_add(db: &DatabaseConnection, dtos: Vec<EmployeeDto>) -> anyhow::Result<usize> {
    let count = dtos.len();
    let txn = db.begin().await?;
    for dto in dtos {
        repository::insert(&txn, dto).await?;
    }
    txn.commit().await?;
    Ok(count)
}

pub async fn get_by_id(db: &DatabaseConnection, id: i64) -> anyhow::Result<Option<Employee>> {
    repository::get_by_id(db, id).await
}

pub async fn list_all(db: &DatabaseConnection) -> anyhow::Result<Vec<Employee>> {
    repository::list_all(db).await
}

/// All employees as an xlsx workbook, one sheet, header row first
pub async fn export_xlsx(db: &DatabaseConnection) -> anyhow::Result<Vec<u8>> {
    let employees = repository::list_all(db).await?;
    let rows = employees.into_iter().map(|e| {
        vec![
            CellValue::Number(e.id as f64),
            CellValue::Text(e.name),
            CellValue::Number(f64::from(e.age)),
            CellValue::Text(e.position),
            CellValue::Number(e.salary),
        ]
    });
    Ok(write_table("Sheet1", &EMPLOYEE_COLUMNS, rows)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::data::db::memory_database;
    use crate::shared::spreadsheet::{decode, SpreadsheetFormat};

    fn dto(name: &str, age: i32) -> EmployeeDto {
        EmployeeDto {
            name: name.to_string(),
            age,
            position: "Analyst".to_string(),
            salary: 3100.0,
        }
    }

    #[tokio::test]
    async fn test_update_unknown_id_is_none() {
        let db = memory_database().await;
        assert_eq!(update(&db, 42, dto("Ann", 30)).await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_update_replaces_fields() {
        let db = memory_database().await;
        let created = create(&db, dto("Ann", 30)).await.unwrap();

        let updated = update(&db, created.id, dto("Ann Lee", 31))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.id, created.id);
        assert_eq!(updated.name, "Ann Lee");
        assert_eq!(get_by_id(&db, created.id).await.unwrap(), Some(updated));
    }

    #[tokio::test]
    async fn test_bulk_add_and_bulk_delete() {
        let db = memory_database().await;
        let added = bulk_add(&db, vec![dto("A", 20), dto("B", 21), dto("C", 22)])
            .await
            .unwrap();
        assert_eq!(added, 3);

        let ids: Vec<i64> = list_all(&db).await.unwrap().iter().map(|e| e.id).collect();
        assert_eq!(bulk_delete(&db, &ids[..2]).await.unwrap(), 2);
        assert_eq!(bulk_delete(&db, &[999]).await.unwrap(), 0);
        assert_eq!(list_all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_export_reads_back() {
        let db = memory_database().await;
        create(&db, dto("Ann", 30)).await.unwrap();
        create(&db, dto("Bob", 44)).await.unwrap();

        let bytes = export_xlsx(&db).await.unwrap();
        let mut rows = decode(bytes, SpreadsheetFormat::Workbook).unwrap();
        assert_eq!(rows.headers(), EMPLOYEE_COLUMNS);

        let first = rows.next().unwrap().unwrap();
        assert_eq!(first.get("id"), &CellValue::Number(1.0));
        assert_eq!(first.get("name"), &CellValue::Text("Ann".into()));
        assert_eq!(first.get("salary"), &CellValue::Number(3100.0));
        assert!(rows.next().unwrap().is_ok());
        assert!(rows.next().is_none());
    }
}
