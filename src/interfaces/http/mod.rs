use crate::application::use_cases::chart_synthesizer::SynthesizerOptions;
use crate::application::{ChartGenerationUseCase, ChartSuggestionUseCase, SpreadsheetIngestionUseCase};
use crate::domain::chart::ChartSpec;
use crate::domain::error::AppError;
use crate::domain::llm_config::LLMConfig;
use crate::domain::spreadsheet::SavedChartInput;
use crate::infrastructure::config::AppConfig;
use crate::infrastructure::db::repository::PlanixRepository;

use std::sync::Arc;

use actix_cors::Cors;
use actix_web::{delete, dev::Server, get, post, web, App, HttpResponse, HttpServer, Responder};
use base64::Engine;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use validator::Validate;

pub struct HttpState {
    pub config: AppConfig,
    pub repository: Arc<PlanixRepository>,
    pub ingestion: SpreadsheetIngestionUseCase,
    pub charts: ChartGenerationUseCase,
    pub suggestions: ChartSuggestionUseCase,
}

#[derive(Deserialize, Validate)]
pub struct UploadRequest {
    #[validate(length(min = 1, max = 255))]
    pub file_name: String,
    #[validate(length(min = 1))]
    pub content_base64: String,
}

#[derive(Deserialize)]
pub struct ChartQuery {
    pub max_per_sheet: Option<usize>,
    #[serde(default)]
    pub include_first_row: bool,
}

#[derive(Deserialize, Validate)]
pub struct SuggestRequest {
    #[validate(length(max = 2000))]
    pub instruction: Option<String>,
    /// Overrides the server's default LLM configuration for this request.
    pub config: Option<LLMConfig>,
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

fn error_response(err: &AppError) -> HttpResponse {
    match err {
        AppError::NotFound(_) => HttpResponse::NotFound().body(err.to_string()),
        AppError::ValidationError(_) | AppError::ParseError(_) => {
            HttpResponse::BadRequest().body(err.to_string())
        }
        AppError::LLMError(_) => HttpResponse::BadGateway().body(err.to_string()),
        _ => HttpResponse::InternalServerError().body(err.to_string()),
    }
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(HealthResponse { status: "ok" })
}

#[post("/spreadsheets")]
async fn upload_spreadsheet(
    data: web::Data<HttpState>,
    req: web::Json<UploadRequest>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return HttpResponse::BadRequest().body(e.to_string());
    }

    let bytes = match base64::engine::general_purpose::STANDARD.decode(&req.content_base64) {
        Ok(bytes) => bytes,
        Err(e) => {
            return HttpResponse::BadRequest().body(format!("Invalid base64 payload: {}", e));
        }
    };

    info!(file_name = %req.file_name, size = bytes.len(), "Upload received");

    match data.ingestion.ingest(&req.file_name, &bytes).await {
        Ok(spreadsheet) => HttpResponse::Created().json(spreadsheet),
        Err(e) => {
            error!(file_name = %req.file_name, error = %e, "Upload failed");
            error_response(&e)
        }
    }
}

#[get("/spreadsheets")]
async fn list_spreadsheets(data: web::Data<HttpState>) -> impl Responder {
    match data.repository.list_spreadsheets().await {
        Ok(spreadsheets) => HttpResponse::Ok().json(spreadsheets),
        Err(e) => error_response(&e),
    }
}

#[get("/spreadsheets/{id}")]
async fn get_spreadsheet(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.repository.get_spreadsheet(path.into_inner()).await {
        Ok(spreadsheet) => HttpResponse::Ok().json(spreadsheet),
        Err(e) => error_response(&e),
    }
}

#[delete("/spreadsheets/{id}")]
async fn delete_spreadsheet(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.repository.delete_spreadsheet(path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[get("/spreadsheets/{id}/tables")]
async fn get_tables(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.charts.tables(path.into_inner()).await {
        Ok(tables) => HttpResponse::Ok().json(tables),
        Err(e) => error_response(&e),
    }
}

#[get("/spreadsheets/{id}/charts")]
async fn get_charts(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    query: web::Query<ChartQuery>,
) -> impl Responder {
    let options = SynthesizerOptions {
        include_first_row: query.include_first_row,
        max_charts_per_sheet: query
            .max_per_sheet
            .map(|cap| if cap == 0 { None } else { Some(cap) })
            .unwrap_or_else(|| data.config.charts.per_sheet_cap()),
    };

    match data.charts.generate(path.into_inner(), &options).await {
        Ok(charts) => HttpResponse::Ok().json(charts),
        Err(e) => error_response(&e),
    }
}

#[post("/spreadsheets/{id}/charts")]
async fn save_chart(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<ChartSpec>,
) -> impl Responder {
    let spec = req.into_inner();
    if spec.labels.is_empty()
        || spec.labels.len() != spec.values.len()
        || spec.values.iter().any(|v| !v.is_finite())
    {
        return HttpResponse::BadRequest()
            .body("Chart labels and values must be parallel, non-empty and finite");
    }

    let labels_json = serde_json::to_string(&spec.labels).unwrap_or_else(|_| "[]".to_string());
    let values_json = serde_json::to_string(&spec.values).unwrap_or_else(|_| "[]".to_string());
    let input = SavedChartInput {
        spreadsheet_id: path.into_inner(),
        chart_type: spec.chart_type.as_str().to_string(),
        title: spec.title,
        labels_json,
        values_json,
        source_sheet: spec.source_sheet,
    };

    match data.repository.insert_saved_chart(input).await {
        Ok(chart) => HttpResponse::Created().json(chart),
        Err(e) => error_response(&e),
    }
}

#[get("/spreadsheets/{id}/charts/saved")]
async fn list_saved_charts(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.repository.list_saved_charts(path.into_inner()).await {
        Ok(charts) => HttpResponse::Ok().json(charts),
        Err(e) => error_response(&e),
    }
}

#[delete("/charts/{chart_id}")]
async fn delete_saved_chart(data: web::Data<HttpState>, path: web::Path<i64>) -> impl Responder {
    match data.repository.delete_saved_chart(path.into_inner()).await {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[post("/spreadsheets/{id}/suggestions")]
async fn suggest_charts(
    data: web::Data<HttpState>,
    path: web::Path<i64>,
    req: web::Json<SuggestRequest>,
) -> impl Responder {
    if let Err(e) = req.validate() {
        return HttpResponse::BadRequest().body(e.to_string());
    }

    let spreadsheet_id = path.into_inner();
    let llm_config = req.config.clone().unwrap_or_else(|| data.config.llm.clone());

    info!(
        spreadsheet_id,
        provider = ?llm_config.provider,
        model = %llm_config.model,
        "Requesting AI chart suggestions"
    );

    let tables = match data.charts.tables(spreadsheet_id).await {
        Ok(tables) => tables,
        Err(e) => return error_response(&e),
    };

    match data
        .suggestions
        .suggest(
            &tables,
            &llm_config,
            req.instruction.as_deref(),
            data.config.charts.max_ai_suggestions,
        )
        .await
    {
        Ok(charts) => HttpResponse::Ok().json(charts),
        Err(e) => {
            error!(spreadsheet_id, error = %e, "AI suggestion failed");
            error_response(&e)
        }
    }
}

pub fn start_server(state: HttpState) -> std::io::Result<Server> {
    let host = state.config.server.host.clone();
    let port = state.config.server.port;
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Dashboard frontend runs on its own origin

        App::new().wrap(cors).app_data(state.clone()).service(
            web::scope("/api")
                .service(health)
                .service(upload_spreadsheet)
                .service(list_spreadsheets)
                .service(get_spreadsheet)
                .service(delete_spreadsheet)
                .service(get_tables)
                .service(get_charts)
                .service(save_chart)
                .service(list_saved_charts)
                .service(delete_saved_chart)
                .service(suggest_charts),
        )
    })
    .bind((host.as_str(), port))?
    .run();

    Ok(server)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_upload_request_validation() {
        let ok = UploadRequest {
            file_name: "vendas.csv".to_string(),
            content_base64: "UHJvZHV0bw==".to_string(),
        };
        assert!(ok.validate().is_ok());

        let empty_name = UploadRequest {
            file_name: String::new(),
            content_base64: "UHJvZHV0bw==".to_string(),
        };
        assert!(empty_name.validate().is_err());

        let empty_content = UploadRequest {
            file_name: "vendas.csv".to_string(),
            content_base64: String::new(),
        };
        assert!(empty_content.validate().is_err());
    }

    #[test]
    fn test_error_response_status_mapping() {
        assert_eq!(
            error_response(&AppError::NotFound("x".to_string())).status(),
            actix_web::http::StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_response(&AppError::ValidationError("x".to_string())).status(),
            actix_web::http::StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_response(&AppError::LLMError("x".to_string())).status(),
            actix_web::http::StatusCode::BAD_GATEWAY
        );
        assert_eq!(
            error_response(&AppError::DatabaseError("x".to_string())).status(),
            actix_web::http::StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
