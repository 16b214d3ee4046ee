// 模块声明
pub mod cli;
pub mod config;
pub mod errors;
pub mod iterator;
pub mod wordlist;
