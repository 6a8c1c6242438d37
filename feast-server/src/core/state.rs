use std::sync::Arc;

use sqlx::SqlitePool;

use crate::auth::JwtService;
use crate::auth::password;
use crate::core::Config;
use crate::db::DbService;
use crate::db::repository::user;
use shared::models::{UserCreate, UserRole};

/// 服务器状态 - 持有所有服务的共享引用
///
/// 使用 Arc/池句柄实现浅拷贝，克隆成本极低。
///
/// | 字段 | 类型 | 说明 |
/// |------|------|------|
/// | config | Config | 配置项 (不可变) |
/// | pool | SqlitePool | SQLite 连接池 |
/// | jwt_service | Arc<JwtService> | JWT 认证服务 |
#[derive(Clone)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// SQLite 连接池
    pub pool: SqlitePool,
    /// JWT 认证服务 (Arc 共享所有权)
    pub jwt_service: Arc<JwtService>,
}

impl ServerState {
    /// 创建服务器状态 (手动构造，测试常用)
    pub fn new(config: Config, pool: SqlitePool, jwt_service: Arc<JwtService>) -> Self {
        Self {
            config,
            pool,
            jwt_service,
        }
    }

    /// 初始化服务器状态
    ///
    /// 按顺序初始化：
    /// 1. 数据库 (连接池 + 迁移)
    /// 2. JWT 服务
    /// 3. 引导管理员账户 (如果配置了 ADMIN_PASSWORD 且不存在)
    ///
    /// # Panics
    ///
    /// 数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        let db = DbService::new(&config.database_path)
            .await
            .expect("Failed to initialize database");

        let jwt_service = Arc::new(JwtService::with_config(config.jwt.clone()));

        let state = Self::new(config.clone(), db.pool, jwt_service);

        if let Err(e) = state.bootstrap_admin().await {
            tracing::error!("Admin bootstrap failed: {}", e);
        }

        state
    }

    /// 获取 JWT 服务
    pub fn get_jwt_service(&self) -> Arc<JwtService> {
        self.jwt_service.clone()
    }

    /// 确保存在一个管理员账户
    ///
    /// 未配置 ADMIN_PASSWORD 时跳过；已存在同名账户时跳过。
    async fn bootstrap_admin(&self) -> Result<(), crate::utils::AppError> {
        let Some(admin_password) = self.config.admin_password.clone() else {
            tracing::debug!("ADMIN_PASSWORD not set, skipping admin bootstrap");
            return Ok(());
        };

        if user::find_by_username(&self.pool, &self.config.admin_username)
            .await
            .map_err(crate::utils::AppError::from)?
            .is_some()
        {
            return Ok(());
        }

        let password_hash = password::hash_password(&admin_password)?;
        let data = UserCreate {
            username: self.config.admin_username.clone(),
            email: self.config.admin_email.clone(),
            password: String::new(), // already hashed above, never stored
            first_name: "Feast".to_string(),
            last_name: "Admin".to_string(),
            phone: None,
        };
        let admin = user::create(&self.pool, &data, &password_hash, UserRole::Admin)
            .await
            .map_err(crate::utils::AppError::from)?;

        tracing::info!(
            username = %admin.username,
            "Bootstrapped initial admin account"
        );
        Ok(())
    }
}
