//! Vocalis - TTS 工作流的项目/音色管理后端
//!
//! - Domain: voicepack/ (pack 导入)
//! - Application: commands, queries, ports
//! - Infrastructure: http, persistence, adapters, memory

use std::sync::Arc;

use vocalis::config::{load_config, print_config};
use vocalis::infrastructure::adapters::{
    FileMediaStorage, HttpTtsClient, HttpTtsClientConfig, HttpVoiceCreator,
    HttpVoiceCreatorConfig,
};
use vocalis::infrastructure::http::{AppState, HttpServer, ImportSettings, ServerConfig};
use vocalis::infrastructure::memory::InMemoryImportManager;
use vocalis::infrastructure::persistence::sqlite::{
    create_pool, run_migrations, DatabaseConfig, SqliteOutputRepository, SqliteProjectRepository,
    SqliteVoiceRepository,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 加载配置（优先级：环境变量 > 配置文件 > 默认值）
    let config = load_config().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    // 初始化日志
    let log_filter = format!(
        "{},vocalis={},tower_http=debug",
        config.log.level, config.log.level
    );
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&log_filter)),
        )
        .init();

    tracing::info!("Vocalis - TTS voice/project management backend");
    print_config(&config);

    // 确保数据目录存在
    tokio::fs::create_dir_all(&config.storage.voices_dir).await?;
    tokio::fs::create_dir_all(&config.storage.outputs_dir).await?;
    if let Some(parent) = std::path::Path::new(&config.database.path).parent() {
        tokio::fs::create_dir_all(parent).await?;
    }

    // 初始化数据库（显式连接池 + 幂等迁移）
    let db_config = DatabaseConfig {
        database_url: config.database.database_url(),
        max_connections: config.database.max_connections,
    };
    let pool = create_pool(&db_config).await?;
    run_migrations(&pool).await?;

    // 创建 Repository 适配器
    let project_repo = Arc::new(SqliteProjectRepository::new(pool.clone()));
    let voice_repo = Arc::new(SqliteVoiceRepository::new(pool.clone()));
    let output_repo = Arc::new(SqliteOutputRepository::new(pool.clone()));

    // 创建媒体文件存储
    let media_storage = Arc::new(
        FileMediaStorage::new(&config.storage.voices_dir, &config.storage.outputs_dir).await?,
    );

    // 创建 HTTP TTS 客户端
    let tts_config = HttpTtsClientConfig {
        base_url: config.tts.url.clone(),
        timeout_secs: config.tts.timeout_secs,
    };
    let tts_engine = Arc::new(HttpTtsClient::new(tts_config)?);

    // 创建音色创建端点客户端（pack 导入上传器，默认回连本服务）
    let creator_base_url = config
        .import
        .creator_base_url
        .clone()
        .unwrap_or_else(|| config.server.public_base_url());
    let voice_creator = Arc::new(HttpVoiceCreator::new(HttpVoiceCreatorConfig::new(
        creator_base_url,
    ))?);

    // 创建内存导入会话管理器
    let import_manager = Arc::new(InMemoryImportManager::new());

    // 创建 HTTP 服务器
    let server_config = ServerConfig::new(&config.server.host, config.server.port);
    let state = AppState::new(
        project_repo,
        voice_repo,
        output_repo,
        media_storage,
        tts_engine,
        voice_creator,
        import_manager,
        ImportSettings {
            max_voice_file_size: config.import.max_voice_file_size,
        },
    );

    let server = HttpServer::new(server_config, state);

    tracing::info!("Starting HTTP server...");

    // 启动服务器（带优雅关闭）
    server
        .run_with_shutdown(async {
            tokio::signal::ctrl_c()
                .await
                .expect("Failed to listen for ctrl-c");
            tracing::info!("Received shutdown signal");
        })
        .await?;

    tracing::info!("Server shutdown complete");

    Ok(())
}
