//! HTTP Routes
//!
//! API 路由定义
//!
//! API Endpoints:
//! - /api/ping                          GET    存活检查
//! - /api/init                          GET    就绪检查（数据库可应答）
//! - /api/projects                      GET    分页列出项目 / POST 创建项目
//! - /api/projects/{id}                 GET    项目详情 / PATCH 重命名 / DELETE 删除
//! - /api/projects/{id}/outputs         GET    分页列出项目生成结果
//! - /api/voices                        GET    分页搜索音色 / POST 创建音色（multipart）
//! - /api/voices/pack                   POST   上传并解析 voice pack（multipart zip）
//! - /api/voices/pack/{id}              GET    导入状态与进度
//! - /api/voices/pack/{id}/confirm      POST   确认导入，执行上传循环
//! - /api/voices/pack/{id}/discard      POST   丢弃待确认会话
//! - /api/voices/{id}                   GET    音色详情 / PATCH 部分更新 / DELETE 软删除
//! - /api/voices/{id}/audio             GET    参考音频下载
//! - /api/voices/{id}/waveform          GET    波形图下载
//! - /api/tts                           POST   生成语音（返回 WAV 字节）
//! - /api/outputs                       GET    分页列出全部生成结果
//! - /api/outputs/{id}                  DELETE 删除生成结果
//! - /api/outputs/{id}/audio            GET    生成音频下载
//! - /api/outputs/{id}/waveform         GET    波形图下载

use axum::{
    routing::{delete, get, post},
    Router,
};
use std::sync::Arc;

use super::handlers;
use super::state::AppState;

/// 创建所有路由
pub fn create_routes() -> Router<Arc<AppState>> {
    Router::new().nest("/api", api_routes())
}

/// API 路由
fn api_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/ping", get(handlers::ping))
        .route("/init", get(handlers::init))
        .nest("/projects", project_routes())
        .nest("/voices", voice_routes())
        .nest("/outputs", output_routes())
        .route("/tts", post(handlers::generate_tts))
}

/// Project 路由
fn project_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_projects).post(handlers::create_project))
        .route(
            "/:project_id",
            get(handlers::get_project)
                .patch(handlers::update_project)
                .delete(handlers::delete_project),
        )
        .route("/:project_id/outputs", get(handlers::list_project_outputs))
}

/// Voice 路由（pack 导入挂在 /voices/pack 下，静态段优先于参数段）
fn voice_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_voices).post(handlers::create_voice))
        .route("/pack", post(handlers::upload_voice_pack))
        .route("/pack/:session_id", get(handlers::get_voice_pack_status))
        .route("/pack/:session_id/confirm", post(handlers::confirm_voice_pack))
        .route("/pack/:session_id/discard", post(handlers::discard_voice_pack))
        .route(
            "/:voice_id",
            get(handlers::get_voice)
                .patch(handlers::update_voice)
                .delete(handlers::delete_voice),
        )
        .route("/:voice_id/audio", get(handlers::download_voice_audio))
        .route("/:voice_id/waveform", get(handlers::download_voice_waveform))
}

/// Output 路由
fn output_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/", get(handlers::list_outputs))
        .route("/:output_id", delete(handlers::delete_output))
        .route("/:output_id/audio", get(handlers::download_output_audio))
        .route(
            "/:output_id/waveform",
            get(handlers::download_output_waveform),
        )
}
