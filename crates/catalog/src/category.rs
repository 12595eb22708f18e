use serde::{Deserialize, Serialize};
use serde_json::Value;

use shop_core::{CategoryId, Entity, ValidationErrors};

use crate::rules::TextRule;

pub const NAME: TextRule = TextRule::between(3, 100);

/// A product category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
}

impl Entity for Category {
    type Id = CategoryId;
    const RESOURCE: &'static str = "Category";

    fn id(&self) -> Self::Id {
        self.id
    }
}

/// Category together with the number of products referencing it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryWithCount {
    pub category: Category,
    pub products_count: u64,
}

/// Unvalidated create/update payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct CategoryDraft {
    pub name: Option<Value>,
}

/// Validated category fields, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCategory {
    pub name: String,
}

impl CategoryDraft {
    pub fn validate(self) -> Result<NewCategory, ValidationErrors> {
        let mut errors = ValidationErrors::new();
        let name = NAME.required(&mut errors, "name", self.name);

        match name {
            Some(name) if errors.is_empty() => Ok(NewCategory { name }),
            _ => Err(errors),
        }
    }
}

impl NewCategory {
    pub fn into_category(self, id: CategoryId) -> Category {
        Category { id, name: self.name }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn valid_name_is_trimmed() {
        let draft = CategoryDraft {
            name: Some(json!("  Books ")),
        };
        assert_eq!(draft.validate().unwrap().name, "Books");
    }

    #[test]
    fn name_needs_three_characters() {
        let draft = CategoryDraft {
            name: Some(json!("ab")),
        };
        let errors = draft.validate().unwrap_err();
        assert_eq!(
            errors.messages("name"),
            ["Ensure this field has at least 3 characters."]
        );
    }

    #[test]
    fn missing_name_is_required() {
        let errors = CategoryDraft::default().validate().unwrap_err();
        assert!(errors.contains("name"));
    }
}
