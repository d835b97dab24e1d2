use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Supplier {
    #[schema(example = "SUP01")]
    pub supplier_id: String,

    #[schema(example = "PT Elektronik Nusantara")]
    pub supplier_name: String,

    #[schema(example = "021-5567890")]
    pub contact: String,
}
