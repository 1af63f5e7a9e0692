use crate::token::{CommentToken, ItemHeader};

/// A free-text note placed on the canvas.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comment {
    pub label: String,
    pub width: f64,
    pub height: f64,
}

impl Comment {
    #[must_use]
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            width: 200.0,
            height: 80.0,
        }
    }

    #[must_use]
    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    #[must_use]
    pub fn to_token(&self, header: ItemHeader) -> CommentToken {
        CommentToken {
            header,
            label: self.label.clone(),
            width: self.width,
            height: self.height,
        }
    }

    pub fn load_token(&mut self, token: &CommentToken) {
        self.label.clone_from(&token.label);
        self.width = token.width;
        self.height = token.height;
    }
}
