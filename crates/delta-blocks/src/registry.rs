//! Block handler registry
//!
//! Same discipline as the format registry: add-only, built during setup,
//! read afterwards.

use std::collections::HashMap;

use delta_schema::SchemaError;
use serde_json::Value;
use tracing::trace;

use crate::handler::BlockHandler;
use crate::table::TableBlockHandler;

#[derive(Default)]
pub struct BlockHandlerRegistry {
    handlers: Vec<Box<dyn BlockHandler>>,
    by_type: HashMap<String, usize>,
}

impl BlockHandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in handlers (`table`).
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        // Built-in types are distinct.
        let _ = registry.register(TableBlockHandler);
        registry
    }

    pub fn register<H: BlockHandler + 'static>(
        &mut self,
        handler: H,
    ) -> Result<&mut Self, SchemaError> {
        self.register_boxed(Box::new(handler))
    }

    pub fn register_boxed(
        &mut self,
        handler: Box<dyn BlockHandler>,
    ) -> Result<&mut Self, SchemaError> {
        let block_type = handler.block_type().to_string();
        if self.by_type.contains_key(&block_type) {
            return Err(SchemaError::DuplicateBlockHandler(block_type));
        }
        trace!(block_type = %block_type, "registering block handler");
        self.by_type.insert(block_type, self.handlers.len());
        self.handlers.push(handler);
        Ok(self)
    }

    pub fn get(&self, block_type: &str) -> Option<&dyn BlockHandler> {
        self.by_type
            .get(block_type)
            .map(|&i| self.handlers[i].as_ref())
    }

    pub fn has(&self, block_type: &str) -> bool {
        self.by_type.contains_key(block_type)
    }

    /// Handler for a block value, dispatched on its `type` field.
    pub fn for_data(&self, data: &Value) -> Option<&dyn BlockHandler> {
        data.get("type")
            .and_then(Value::as_str)
            .and_then(|t| self.get(t))
    }

    /// Registered types, in registration order.
    pub fn types(&self) -> Vec<&str> {
        self.handlers.iter().map(|h| h.block_type()).collect()
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl std::fmt::Debug for BlockHandlerRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlockHandlerRegistry")
            .field("types", &self.types())
            .finish()
    }
}
