use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use boardrent_core::{CustomerId, DomainError, DomainResult, Entity, ValueObject};

/// Brazilian tax identifier: exactly 11 digits.
///
/// Stored and compared as the raw digit string. Uniqueness across
/// customers is enforced by the gateway, not here.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cpf(String);

impl Cpf {
    pub fn parse(raw: impl Into<String>) -> DomainResult<Self> {
        let raw = raw.into();
        if raw.len() != 11 || !raw.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_input("cpf must be exactly 11 digits"));
        }
        Ok(Self(raw))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl ValueObject for Cpf {}

impl core::fmt::Display for Cpf {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Entity: a registered customer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    id: CustomerId,
    name: String,
    phone: String,
    cpf: Cpf,
    birthday: NaiveDate,
}

impl Customer {
    /// Validated constructor.
    ///
    /// Phone numbers are 10 or 11 digits (landline or mobile, DDD included).
    pub fn new(
        id: CustomerId,
        name: impl Into<String>,
        phone: impl Into<String>,
        cpf: Cpf,
        birthday: NaiveDate,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::invalid_input("name cannot be empty"));
        }

        let phone = phone.into();
        if !(10..=11).contains(&phone.len()) || !phone.bytes().all(|b| b.is_ascii_digit()) {
            return Err(DomainError::invalid_input("phone must be 10 or 11 digits"));
        }

        Ok(Self {
            id,
            name,
            phone,
            cpf,
            birthday,
        })
    }

    /// Rebuild a customer from already-persisted fields, skipping validation.
    pub fn from_record(
        id: CustomerId,
        name: String,
        phone: String,
        cpf: Cpf,
        birthday: NaiveDate,
    ) -> Self {
        Self {
            id,
            name,
            phone,
            cpf,
            birthday,
        }
    }

    pub fn id_typed(&self) -> CustomerId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn phone(&self) -> &str {
        &self.phone
    }

    pub fn cpf(&self) -> &Cpf {
        &self.cpf
    }

    pub fn birthday(&self) -> NaiveDate {
        self.birthday
    }
}

impl Entity for Customer {
    type Id = CustomerId;

    fn id(&self) -> &Self::Id {
        &self.id
    }
}
