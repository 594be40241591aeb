use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::common::DoughId;
use crate::domains::doughs::models::{Dough, DoughInput};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoughBrief {
    pub id: DoughId,
    pub name: String,
    pub is_protected: bool,
    pub is_base: bool,
    pub price: Decimal,
    pub stock: i32,
}

impl From<Dough> for DoughBrief {
    fn from(dough: Dough) -> Self {
        Self {
            id: dough.id,
            name: dough.name,
            is_protected: dough.is_protected,
            is_base: dough.is_base,
            price: dough.price,
            stock: dough.stock,
        }
    }
}

/// Edit form of a dough.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DoughEdit {
    pub id: DoughId,
    pub name: String,
    pub is_protected: bool,
    pub notes: Option<String>,
    pub price: Decimal,
    pub stock: i32,
}

impl From<Dough> for DoughEdit {
    fn from(dough: Dough) -> Self {
        Self {
            id: dough.id,
            name: dough.name,
            is_protected: dough.is_protected,
            notes: dough.notes,
            price: dough.price,
            stock: dough.stock,
        }
    }
}

impl From<DoughEdit> for DoughInput {
    fn from(edit: DoughEdit) -> Self {
        Self {
            name: edit.name,
            is_protected: edit.is_protected,
            notes: edit.notes,
            price: edit.price,
            stock: edit.stock,
        }
    }
}
