//! Feast Server - 餐饮宴会预订管理系统
//!
//! # 架构概述
//!
//! 本模块是 Feast Server 的主入口，提供以下核心功能：
//!
//! - **认证** (`auth`): JWT + Argon2 认证体系
//! - **数据库** (`db`): SQLite (sqlx) 存储与仓储层
//! - **预订核心** (`bookings`): 菜单校验、价格快照、金额计算
//! - **收据** (`receipts`): 税额计算、单号分配、HTML 渲染
//! - **HTTP API** (`api`): RESTful API 接口
//!
//! # 模块结构
//!
//! ```text
//! feast-server/src/
//! ├── core/          # 配置、状态、服务器、错误
//! ├── auth/          # JWT 认证、密码哈希、中间件
//! ├── db/            # 连接池、迁移、仓储层
//! ├── bookings/      # 预订工作流与金额计算
//! ├── receipts/      # 收据生成与渲染
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误类型、日志、校验
//! ```

pub mod api;
pub mod auth;
pub mod bookings;
pub mod core;
pub mod db;
pub mod receipts;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentUser, JwtService};
pub use core::{Config, Server, ServerState, build_app};
pub use utils::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

pub fn print_banner() {
    println!(
        r#"
    ______               __
   / ____/__  ____ _____/ /_
  / /_  / _ \/ __ `/ ___/ __/
 / __/ /  __/ /_/ (__  ) /_
/_/    \___/\__,_/____/\__/
    "#
    );
}
