//! 预初始化动作

use binding_common::BoxError;
use std::fmt;
use std::sync::Arc;

type ActionFn = dyn Fn() -> Result<(), BoxError> + Send + Sync;

/// 具名的无参预初始化动作
#[derive(Clone)]
pub struct PreInitAction {
    name: String,
    action: Arc<ActionFn>,
}

impl PreInitAction {
    /// 创建预初始化动作
    pub fn new<F>(name: impl Into<String>, action: F) -> Self
    where
        F: Fn() -> Result<(), BoxError> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            action: Arc::new(action),
        }
    }

    /// 动作名称
    pub fn name(&self) -> &str {
        &self.name
    }

    /// 执行动作
    pub fn run(&self) -> Result<(), BoxError> {
        (self.action)()
    }
}

impl fmt::Debug for PreInitAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PreInitAction")
            .field("name", &self.name)
            .finish()
    }
}
