use std::sync::Arc;

use datadriven_core::{
    AttributeStore, DataDrivenError, DataEntry, DataSetSource, Dataset, DeferredData, LabeledData,
};
use serde_json::Value;

use crate::{expand, registry};

/// A test method definition and the data sources registered for it.
///
/// The `data*` methods chain so a definition reads top to bottom:
///
/// ```rust,ignore
/// let mut method = TestMethod::new("test_parse");
/// method
///     .data("empty", json!(""))
///     .data("word", json!("hello"));
/// ```
#[derive(Debug, Clone)]
pub struct TestMethod {
    name: String,
    data: Option<Vec<DataSetSource>>,
}

impl TestMethod {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// True once any data source has been registered.
    pub fn is_data_driven(&self) -> bool {
        self.data.is_some()
    }

    pub fn data(&mut self, label: impl Into<String>, dataset: Dataset) -> &mut Self {
        registry::data(self, label, dataset);
        self
    }

    pub fn data_set(&mut self, mapping: LabeledData) -> &mut Self {
        registry::data_set(self, mapping);
        self
    }

    pub fn data_with<F>(&mut self, compute: F) -> &mut Self
    where
        F: Fn() -> Result<LabeledData, DataDrivenError> + Send + Sync + 'static,
    {
        registry::data_with(self, compute);
        self
    }

    pub fn register(
        &mut self,
        args: Vec<Value>,
        block: Option<Arc<DeferredData>>,
    ) -> Result<&mut Self, DataDrivenError> {
        registry::register(self, args, block)?;
        Ok(self)
    }

    /// Expand this method's sources into ordered entries.
    pub fn entries(&self) -> Result<Vec<DataEntry>, DataDrivenError> {
        expand(self.data_sources().unwrap_or_default())
    }
}

impl AttributeStore for TestMethod {
    fn data_sources(&self) -> Option<&[DataSetSource]> {
        self.data.as_deref()
    }

    fn data_sources_mut(&mut self) -> &mut Vec<DataSetSource> {
        self.data.get_or_insert_with(Vec::new)
    }
}

/// An ordered group of test methods. Each method keeps its own data sources.
#[derive(Debug, Clone, Default)]
pub struct TestCase {
    name: String,
    methods: Vec<TestMethod>,
}

impl TestCase {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            methods: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the method called `name`, defining it if it does not exist yet.
    pub fn method(&mut self, name: &str) -> &mut TestMethod {
        let index = match self.methods.iter().position(|m| m.name == name) {
            Some(index) => index,
            None => {
                self.methods.push(TestMethod::new(name));
                self.methods.len() - 1
            }
        };
        &mut self.methods[index]
    }

    pub fn get(&self, name: &str) -> Option<&TestMethod> {
        self.methods.iter().find(|m| m.name == name)
    }

    /// Methods in definition order.
    pub fn methods(&self) -> &[TestMethod] {
        &self.methods
    }
}
