//! Infrastructure 層
//!
//! Domain 層が定義するインターフェースの具体的な実装と、ワイヤ形式の DTO を提供します。

pub mod dto;
pub mod message_pusher;
pub mod repository;
