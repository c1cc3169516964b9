//! StudyHallのドメインスキーマ。
//!
//! 永続化エンティティの形・デフォルト値・閉じた列挙型と、
//! 作成ペイロードの純粋な検証を提供する。I/Oは持たず、
//! 一意性や外部キーの強制はストレージ層（APIクレート側）の責務。

pub mod chat;
pub mod enrollment;
pub mod enums;
pub mod error;
pub mod instructor;
pub mod payment;
pub mod subscription;
pub mod tables;
pub mod types;
pub mod user;

pub use error::ValidationError;
