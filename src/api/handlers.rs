//! Axum handler functions for the rule endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use tracing::{debug, warn};

use crate::combine::combine;
use crate::{AttributeRecord, EvaluationRecord, Rule, RuleError, RuleId, ValidationError};

use super::error::ApiError;
use super::extract::{JsonBody, PathParam, QueryParams};
use super::types::{
    CombineRequest, CombineResponse, CreateRuleRequest, EvaluateResponse, HealthResponse,
    MessageResponse, PageParams, RuleResponse,
};
use super::AppState;

pub(crate) async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        rules: state.store.len(),
    })
}

// ── List / Get ──────────────────────────────────────────────────────

/// List rules in creation order.
pub(crate) async fn list_rules(
    State(state): State<Arc<AppState>>,
    QueryParams(page): QueryParams<PageParams>,
) -> Json<Vec<RuleResponse>> {
    let rules = state.store.list_page(page.skip, page.limit);
    Json(rules.into_iter().map(RuleResponse::from).collect())
}

pub(crate) async fn get_rule(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<RuleId>,
) -> Result<Json<RuleResponse>, ApiError> {
    Ok(Json(state.store.get(id)?.into()))
}

// ── Create / Delete ─────────────────────────────────────────────────

/// Parse and store a new rule. Malformed rule text is a 400 carrying the
/// lexer or parser position.
pub(crate) async fn create_rule(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CreateRuleRequest>,
) -> Result<(StatusCode, Json<RuleResponse>), ApiError> {
    let rule = state
        .store
        .create(&req.name, req.description, &req.rule_string)
        .inspect_err(|e| warn!(name = %req.name, error = %e, "rejected rule"))?;
    Ok((StatusCode::CREATED, Json(rule.into())))
}

pub(crate) async fn delete_rule(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<RuleId>,
) -> Result<Json<MessageResponse>, ApiError> {
    state.store.delete(id)?;
    Ok(Json(MessageResponse {
        message: format!("rule {id} deleted"),
    }))
}

// ── Evaluate ────────────────────────────────────────────────────────

/// Evaluate a stored rule against the raw JSON object in the body.
pub(crate) async fn evaluate_rule(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<RuleId>,
    JsonBody(body): JsonBody<serde_json::Value>,
) -> Result<Json<EvaluateResponse>, ApiError> {
    let rule = state.store.get(id)?;
    let record = AttributeRecord::try_from(&body)?;
    let result = rule
        .evaluate(&record)
        .map_err(RuleError::from)
        .inspect_err(|e| debug!(rule_id = id, error = %e, "evaluation failed"))?;

    let evaluation = state.store.record_evaluation(id, body, result)?;
    debug!(rule_id = id, result, "rule evaluated");
    Ok(Json(EvaluateResponse {
        rule_id: id,
        result,
        evaluation_id: evaluation.id,
    }))
}

pub(crate) async fn list_evaluations(
    State(state): State<Arc<AppState>>,
    PathParam(id): PathParam<RuleId>,
    QueryParams(page): QueryParams<PageParams>,
) -> Result<Json<Vec<EvaluationRecord>>, ApiError> {
    Ok(Json(state.store.evaluations(id, page.skip, page.limit)?))
}

// ── Combine ─────────────────────────────────────────────────────────

/// Merge two stored rules; optionally persist the result as a new rule.
pub(crate) async fn combine_rules(
    State(state): State<Arc<AppState>>,
    JsonBody(req): JsonBody<CombineRequest>,
) -> Result<(StatusCode, Json<CombineResponse>), ApiError> {
    if req.rule_ids.len() != 2 {
        return Err(ValidationError::new(format!(
            "rule_ids must contain exactly two ids, got {}",
            req.rule_ids.len()
        ))
        .into());
    }

    // Unknown ids make the request itself invalid here, not a 404.
    let rules = req
        .rule_ids
        .iter()
        .map(|&id| {
            state
                .store
                .get(id)
                .map_err(|e| ValidationError::new(e.to_string()))
        })
        .collect::<Result<Vec<Rule>, _>>()?;

    let combined = combine(&rules)?;
    let name = req.name.unwrap_or_else(|| {
        format!("Combined Rule ({},{})", req.rule_ids[0], req.rule_ids[1])
    });

    if !req.save_rule {
        return Ok((
            StatusCode::OK,
            Json(CombineResponse {
                id: None,
                name,
                rule_string: combined.rule_string,
                operator: combined.operator,
                counts: combined.counts,
                ast: combined.root,
            }),
        ));
    }

    let description = req.description.or_else(|| {
        Some(format!(
            "Combination of rules {} and {}",
            req.rule_ids[0], req.rule_ids[1]
        ))
    });
    let saved = state
        .store
        .put(&name, description, &combined.rule_string, combined.root)?;
    Ok((
        StatusCode::CREATED,
        Json(CombineResponse {
            id: Some(saved.id),
            name: saved.name,
            rule_string: saved.rule_string,
            operator: combined.operator,
            counts: combined.counts,
            ast: saved.root,
        }),
    ))
}
