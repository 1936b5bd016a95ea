//! Domain types shared by the integration tests.

#![allow(dead_code)]

use indexmap::IndexMap;
use tessera_model::prelude::*;

// ============================================================================
// MONEY: value object with a union-typed parameter
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Money {
    pub amount: f64,
    pub currency: String,
}

invariants! {
    Money {
        check invariantAmountMustBePositive => |m: &Money| m.amount > 0.0,
        check invariantCurrencyMustBeThreeCharacters => |m: &Money| m.currency.chars().count() == 3,
    }
}

impl Model for Money {
    fn constructor() -> Option<Constructor<Self>> {
        let shape = TypeDescriptor::of::<Self>()
            .param(Param::new("amount", [TypeTag::Int, TypeTag::Float]))
            .param(Param::new("currency", TypeTag::String));

        Some(Constructor::new(shape, |args| {
            Ok(Money {
                amount: args.take("amount")?,
                currency: args.take("currency")?,
            })
        }))
    }

    fn role() -> Role {
        Role::ValueObject
    }
}

impl Attributes for Money {
    fn values(&self) -> IndexMap<String, Value> {
        IndexMap::from([
            ("amount".to_owned(), Value::Float(self.amount)),
            ("currency".to_owned(), Value::from(self.currency.as_str())),
        ])
    }
}

// ============================================================================
// EMAIL: single-check value object
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Email {
    pub value: String,
}

invariants! {
    Email {
        check invariantValidEmailFormat => |e: &Email| {
            e.value
                .split_once('@')
                .is_some_and(|(local, domain)| !local.is_empty() && domain.contains('.'))
        },
    }
}

impl Model for Email {
    fn constructor() -> Option<Constructor<Self>> {
        let shape = TypeDescriptor::of::<Self>().param(Param::new("value", TypeTag::String));
        Some(Constructor::new(shape, |args| {
            Ok(Email {
                value: args.take("value")?,
            })
        }))
    }

    fn role() -> Role {
        Role::ValueObject
    }
}

// ============================================================================
// COMPLEX MODEL: plain model with nullable and collection parameters
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct ComplexModel {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub tags: Vec<Value>,
}

invariants! {
    ComplexModel {
        check invariantNameIsNotEmpty => |m: &ComplexModel| !m.name.is_empty(),
    }
}

impl Model for ComplexModel {
    fn constructor() -> Option<Constructor<Self>> {
        let shape = TypeDescriptor::of::<Self>()
            .param(Param::new("id", TypeTag::Int))
            .param(Param::new("name", TypeTag::String))
            .param(Param::new("description", TypeTag::String).nullable())
            .param(Param::new("tags", TypeTag::Array));

        Some(Constructor::new(shape, |args| {
            Ok(ComplexModel {
                id: args.take("id")?,
                name: args.take("name")?,
                description: args.take("description")?,
                tags: args.take("tags")?,
            })
        }))
    }
}

// ============================================================================
// FLEXIBLE VALUE: three-way union and a nullable default
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
pub struct FlexibleValue {
    pub value: Value,
    pub label: Option<String>,
}

impl HasInvariants for FlexibleValue {}

impl Model for FlexibleValue {
    fn constructor() -> Option<Constructor<Self>> {
        let shape = TypeDescriptor::of::<Self>()
            .param(Param::new("value", [TypeTag::Int, TypeTag::Float, TypeTag::String]))
            .param(
                Param::new("label", TypeTag::String)
                    .nullable()
                    .with_default(Value::Null),
            );

        Some(Constructor::new(shape, |args| {
            Ok(FlexibleValue {
                value: args.take("value")?,
                label: args.take("label")?,
            })
        }))
    }

    fn role() -> Role {
        Role::ValueObject
    }
}

// ============================================================================
// CUSTOM ENTITY: object parameter, auto-check disabled
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UuidValue(pub String);

impl UuidValue {
    pub fn value(id: &str) -> Value {
        Value::Object(ObjectValue::new(Self(id.to_owned())).with_capability("Identifier"))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CustomEntity {
    pub id: UuidValue,
    pub name: String,
}

invariants! {
    CustomEntity {
        check invariantNameNotEmpty => |e: &CustomEntity| !e.name.is_empty(),
    }
}

impl Model for CustomEntity {
    fn constructor() -> Option<Constructor<Self>> {
        let shape = TypeDescriptor::of::<Self>()
            .param(Param::new("id", TypeTag::Class("Identifier")))
            .param(Param::new("name", TypeTag::String));

        Some(Constructor::new(shape, |args| {
            Ok(CustomEntity {
                id: args.take_object("id")?,
                name: args.take("name")?,
            })
        }))
    }

    fn role() -> Role {
        Role::Entity
    }

    fn should_auto_check_invariants() -> bool {
        false
    }
}

impl Attributes for CustomEntity {
    fn values(&self) -> IndexMap<String, Value> {
        IndexMap::from([
            ("id".to_owned(), Value::Object(ObjectValue::new(self.id.clone()).with_capability("Identifier"))),
            ("name".to_owned(), Value::from(self.name.as_str())),
        ])
    }
}

// ============================================================================
// PRICE: value object with its own handler
// ============================================================================

#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InvalidPriceError(pub String);

impl Failure for InvalidPriceError {}

#[derive(Debug, Clone, PartialEq)]
pub struct Price {
    pub amount: f64,
    pub currency: String,
}

invariants! {
    Price {
        check invariantAmountMustBeGreaterThanZero => |p: &Price| p.amount >= 0.0,
        check invariantCurrencyMustBeHaveThreeCharacters => |p: &Price| p.currency.len() == 3,
    }
    handler: reject_price
}

fn reject_price(_: &Price, violations: ViolationSet) -> Result<(), Box<dyn Failure>> {
    Err(Box::new(InvalidPriceError(format!("Invalid Price values: {violations}"))))
}

impl Price {
    pub fn apply_discount(&self, discount: f64) -> ModelResult<Self> {
        with_overrides(self, [("amount", self.amount - self.amount * (discount / 100.0))])
    }
}

impl Model for Price {
    fn constructor() -> Option<Constructor<Self>> {
        let shape = TypeDescriptor::of::<Self>()
            .param(Param::new("amount", TypeTag::Float))
            .param(Param::new("currency", TypeTag::String));

        Some(Constructor::new(shape, |args| {
            Ok(Price {
                amount: args.take("amount")?,
                currency: args.take("currency")?,
            })
        }))
    }

    fn role() -> Role {
        Role::ValueObject
    }
}

impl Attributes for Price {
    fn values(&self) -> IndexMap<String, Value> {
        IndexMap::from([
            ("amount".to_owned(), Value::Float(self.amount)),
            ("currency".to_owned(), Value::from(self.currency.as_str())),
        ])
    }
}

// ============================================================================
// TRANSFER: mixed severities
// ============================================================================

/// Raised when a check cannot even be evaluated; never aggregated.
#[derive(Debug, thiserror::Error)]
#[error("account {0} is closed")]
pub struct AccountClosed(pub String);

impl Failure for AccountClosed {}

/// A collectible failure raised from a check.
#[derive(Debug, thiserror::Error)]
#[error("currency {0} is not supported")]
pub struct CurrencyNotSupported(pub String);

impl Failure for CurrencyNotSupported {
    fn severity(&self) -> Severity {
        Severity::Collectible
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transfer {
    pub amount: i64,
    pub from: String,
    pub to: String,
    pub currency: String,
}

invariants! {
    Transfer {
        check invariantAmountIsPositive => |t: &Transfer| t.amount > 0,
        try_check invariantAccountsAreOpen => |t: &Transfer| -> CheckResult {
            match [&t.from, &t.to].into_iter().find(|account| account.starts_with("closed")) {
                Some(account) => Err(Box::new(AccountClosed(account.clone()))),
                None => Ok(true),
            }
        },
        try_check invariantCurrencyIsSupported => |t: &Transfer| -> CheckResult {
            if ["EUR", "USD"].contains(&t.currency.as_str()) {
                Ok(true)
            } else {
                Err(Box::new(CurrencyNotSupported(t.currency.clone())))
            }
        },
        check invariantAccountsDiffer => |t: &Transfer| t.from != t.to,
    }
}

impl Model for Transfer {
    fn constructor() -> Option<Constructor<Self>> {
        let shape = TypeDescriptor::of::<Self>()
            .param(Param::new("amount", TypeTag::Int))
            .param(Param::new("from", TypeTag::String))
            .param(Param::new("to", TypeTag::String))
            .param(Param::new("currency", TypeTag::String).with_default("EUR"));

        Some(Constructor::new(shape, |args| {
            Ok(Transfer {
                amount: args.take("amount")?,
                from: args.take("from")?,
                to: args.take("to")?,
                currency: args.take("currency")?,
            })
        }))
    }

    fn role() -> Role {
        Role::Entity
    }
}

// ============================================================================
// NO CONSTRUCTOR
// ============================================================================

#[derive(Debug)]
pub struct Opaque;

impl HasInvariants for Opaque {}
impl Model for Opaque {}
