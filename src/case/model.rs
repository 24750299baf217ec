use bon::Builder;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Debug, Eq, PartialEq, Builder)]
pub struct TestCase {
    #[builder(into)]
    pub id: String,
    #[builder(into)]
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[builder(into)]
    pub description: Option<String>,
    #[builder(into)]
    pub url: String,
}
