/// Request payloads for the actions that take more than an id.

use serde::{Deserialize, Serialize};

use crate::action::Params;

/// One order line. A list of these is sent JSON-encoded in `lineitems`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct OrderItem {
    pub pid: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billingcycle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qty: Option<u32>,
}

impl OrderItem {
    pub fn product(pid: u32) -> Self {
        Self {
            pid,
            billingcycle: None,
            domain: None,
            qty: None,
        }
    }
}

/// Field set for `AddClient`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct NewClient {
    pub firstname: String,
    pub lastname: String,
    pub email: String,
    pub address1: String,
    pub city: String,
    pub state: String,
    pub postcode: String,
    pub country: String,
    pub phonenumber: String,
    pub password2: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub companyname: Option<String>,
}

impl NewClient {
    pub fn to_params(&self) -> Params {
        let mut params = Params::new()
            .with("firstname", &self.firstname)
            .with("lastname", &self.lastname)
            .with("email", &self.email)
            .with("address1", &self.address1)
            .with("city", &self.city)
            .with("state", &self.state)
            .with("postcode", &self.postcode)
            .with("country", &self.country)
            .with("phonenumber", &self.phonenumber)
            .with("password2", &self.password2);
        if let Some(company) = &self.companyname {
            params.set("companyname", company);
        }
        params
    }
}
