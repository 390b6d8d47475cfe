use serde::{Deserialize, Serialize};

/// Column order used by spreadsheet import and export
pub const EMPLOYEE_COLUMNS: [&str; 5] = ["id", "name", "age", "position", "salary"];

// ============================================================================
// Aggregate
// ============================================================================

/// Employee record. `id` is the primary identifier: assigned by the store on
/// create, supplied by the file on spreadsheet import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub age: i32,
    pub position: String,
    #[serde(with = "non_finite_f64")]
    pub salary: f64,
}

impl Employee {
    /// Overwrite every editable field from the DTO
    pub fn update(&mut self, dto: &EmployeeDto) {
        self.name = dto.name.clone();
        self.age = dto.age;
        self.position = dto.position.clone();
        self.salary = dto.salary;
    }
}

// ============================================================================
// DTO
// ============================================================================

/// Body of create / update / bulk add requests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmployeeDto {
    pub name: String,
    pub age: i32,
    pub position: String,
    #[serde(with = "non_finite_f64")]
    pub salary: f64,
}

// ============================================================================
// Serde helpers
// ============================================================================

/// JSON has no inf / NaN: they travel as "inf", "-inf" and "nan"
mod non_finite_f64 {
    use serde::de::{self, Unexpected, Visitor};
    use serde::{Deserializer, Serializer};
    use std::fmt;

    pub fn serialize<S: Serializer>(value: &f64, serializer: S) -> Result<S::Ok, S::Error> {
        if value.is_nan() {
            serializer.serialize_str("nan")
        } else if value.is_infinite() && *value > 0.0 {
            serializer.serialize_str("inf")
        } else if value.is_infinite() {
            serializer.serialize_str("-inf")
        } else {
            serializer.serialize_f64(*value)
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        deserializer.deserialize_any(NumberOrText)
    }

    struct NumberOrText;

    impl<'de> Visitor<'de> for NumberOrText {
        type Value = f64;

        fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
            f.write_str("a number or one of \"inf\", \"-inf\", \"nan\"")
        }

        fn visit_f64<E: de::Error>(self, v: f64) -> Result<f64, E> {
            Ok(v)
        }

        fn visit_i64<E: de::Error>(self, v: i64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_u64<E: de::Error>(self, v: u64) -> Result<f64, E> {
            Ok(v as f64)
        }

        fn visit_str<E: de::Error>(self, v: &str) -> Result<f64, E> {
            match v {
                "inf" => Ok(f64::INFINITY),
                "-inf" => Ok(f64::NEG_INFINITY),
                "nan" => Ok(f64::NAN),
                _ => Err(E::invalid_value(Unexpected::Str(v), &self)),
            }
        }
    }
}
