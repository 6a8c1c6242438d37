//! API 路由模块
//!
//! # 结构
//!
//! - [`health`] - 健康检查
//! - [`auth`] - 认证相关接口 (登录/注册/资料)
//! - [`menu`] - 菜单目录接口
//! - [`bookings`] - 预订管理接口
//! - [`receipts`] - 收据接口
//! - [`messages`] - 客户消息接口
//! - [`dashboard`] - 管理员统计面板

pub mod auth;
pub mod bookings;
pub mod dashboard;
pub mod health;
pub mod menu;
pub mod messages;
pub mod receipts;

// Re-export common types for handlers
pub use crate::utils::{AppError, AppResult};
