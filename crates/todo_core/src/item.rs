use serde::Deserialize;

/// A todo record as served by the remote API.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Item {
    #[serde(rename = "id")]
    pub external_id: i64,
    pub title: String,
    pub completed: bool,
    #[serde(rename = "userId")]
    pub owner_id: i64,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("item id {external_id} is less than or equal to zero")]
pub struct InvalidItem {
    pub external_id: i64,
}

impl Item {
    /// Store index this item belongs at. Only positive ids are placeable.
    pub fn slot(&self) -> Result<usize, InvalidItem> {
        usize::try_from(self.external_id)
            .ok()
            .filter(|&index| index > 0)
            .ok_or(InvalidItem {
                external_id: self.external_id,
            })
    }

    pub(crate) fn render_line(&self) -> String {
        format!(
            "ID: {:<7}Completed: {:<9}Title: {}\n",
            self.external_id, self.completed, self.title
        )
    }
}
