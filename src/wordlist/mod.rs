// 默认字典查询
pub mod defaults;

pub use defaults::{BuiltinWordlists, StaticWordlists, WordlistProvider, is_password_only_service};
