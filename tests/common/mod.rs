#![allow(dead_code)]

use std::sync::Arc;

use relq::expr::Path;
use relq::schema::{ColumnMetadata, ForeignKey, RelationalPath};

/// The EMPLOYEE metamodel under a chosen variable, as generated metamodel
/// code would declare it.
pub struct Employee {
    pub rel: Arc<RelationalPath>,
    pub id: Path,
    pub firstname: Path,
    pub lastname: Path,
    pub salary: Path,
    pub superior_id: Path,
    pub superior_id_key: ForeignKey,
}

impl Employee {
    pub fn new(variable: &str) -> Self {
        let mut rel = RelationalPath::new("PUBLIC", "EMPLOYEE", variable);
        let id = rel.add_metadata(
            Path::property(variable, "id"),
            ColumnMetadata::named("ID").with_index(1).not_null().with_size(10),
        );
        let firstname = rel.add_metadata(
            Path::property(variable, "firstname"),
            ColumnMetadata::named("FIRSTNAME").with_index(2).with_size(50),
        );
        let lastname = rel.add_metadata(
            Path::property(variable, "lastname"),
            ColumnMetadata::named("LASTNAME").with_index(3).with_size(50),
        );
        let salary = rel.add_metadata(
            Path::property(variable, "salary"),
            ColumnMetadata::named("SALARY")
                .with_index(4)
                .with_size(10)
                .with_decimal_digits(2),
        );
        let superior_id = rel.add_metadata(
            Path::property(variable, "superiorId"),
            ColumnMetadata::named("SUPERIOR_ID").with_index(5).with_size(10),
        );
        rel.create_primary_key([id.clone()]);
        let superior_id_key = rel.create_foreign_key(superior_id.clone(), "ID");
        Self {
            rel: Arc::new(rel),
            id,
            firstname,
            lastname,
            salary,
            superior_id,
            superior_id_key,
        }
    }
}
