//! Document entity for SeaORM.

use sea_orm::entity::prelude::*;

use parley_core::StoreError;
use parley_core::ports::DocumentSnapshot;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "documents")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub collection: String,
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    #[sea_orm(column_type = "JsonBinary")]
    pub body: Json,
    pub version: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// Conversion from a stored row to a port snapshot.
impl TryFrom<Model> for DocumentSnapshot {
    type Error = StoreError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        let serde_json::Value::Object(data) = model.body else {
            return Err(StoreError::Malformed(format!(
                "{}/{} body is not an object",
                model.collection, model.id
            )));
        };
        Ok(Self {
            id: model.id,
            data,
            version: u64::try_from(model.version).unwrap_or_default(),
        })
    }
}
