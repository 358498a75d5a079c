//! 撮影同意書のPDF生成と保存先フォルダ管理

pub mod assets;
pub mod cli;
pub mod clock;
pub mod config;
pub mod consent;
pub mod error;
pub mod export;
pub mod folder;
pub mod status;
