use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter, Result as FmtResult};

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, PartialEq, Serialize)]
pub enum ProductType {
    #[serde(rename = "digital")]
    Digital,
}

impl ProductType {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            ProductType::Digital => "digital",
        }
    }
}

impl Display for ProductType {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
