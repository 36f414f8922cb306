//! Client for the Frappe REST API backing the marketplace.
//!
//! Lists go through `/api/resource/<Doctype>` and totals through
//! `frappe.desk.reportview.get_count`, which is all server-side pagination needs.
//! Both accept `filters` and `or_filters`.

use crate::config::ClientConfig;
use crate::credits::Quote;
use crate::error::GetProsError;
use crate::filter::{FrappeFilters, TrainerFilter};
use crate::listing;
use crate::models::{
    CASE_STUDY_DOCTYPE, CaseStudy, TRAINER_DOCTYPE, Trainer, WORKSHOP_DOCTYPE, Workshop,
};
use crate::pagination::PageRequest;
use reqwest::Url;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{debug, info, warn};

const CLIENT_USER_AGENT: &str = "getpros-core/0.1";
const ACCEPT_JSON: &str = "application/json";
// frappe.client.get_count has no or_filters parameter
const GET_COUNT_METHOD: &str = "frappe.desk.reportview.get_count";
const CREDIT_ORDER_METHOD: &str = "getpros.api.credits.create_order";
const MAX_ERROR_CHARS: usize = 300;

pub const TRAINER_FIELDS: [&str; 8] = [
    "name",
    "full_name",
    "headline",
    "expertise",
    "city",
    "hourly_rate",
    "rating",
    "image",
];

#[derive(Deserialize)]
struct ListResponse<T> {
    data: Vec<T>,
}

#[derive(Deserialize)]
struct MethodResponse<T> {
    message: T,
}

/// One fetched page of trainers; `request` carries the upstream total
#[derive(Debug, Clone, PartialEq)]
pub struct TrainerPage {
    pub items: Vec<Trainer>,
    pub request: PageRequest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreditOrder {
    pub order_id: String,
    pub amount_paise: u64,
    #[serde(default)]
    pub payment_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FrappeClient {
    client: reqwest::Client,
    base_url: Url,
}

impl FrappeClient {
    pub fn new(config: &ClientConfig) -> Result<Self, GetProsError> {
        let mut headers = reqwest::header::HeaderMap::new();
        headers.insert(
            reqwest::header::USER_AGENT,
            reqwest::header::HeaderValue::from_static(CLIENT_USER_AGENT),
        );
        headers.insert(
            reqwest::header::ACCEPT,
            reqwest::header::HeaderValue::from_static(ACCEPT_JSON),
        );
        if let Some(token) = config.auth_token() {
            let mut value = reqwest::header::HeaderValue::from_str(&token)
                .map_err(|e| GetProsError::Config(format!("Invalid API credentials: {}", e)))?;
            value.set_sensitive(true);
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .build()?;

        let base_url = Url::parse(&config.base_url).map_err(|e| {
            GetProsError::Config(format!("Invalid base URL '{}': {}", config.base_url, e))
        })?;

        Ok(FrappeClient { client, base_url })
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, GetProsError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| GetProsError::Config(format!("Base URL '{}' cannot hold a path", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    pub fn resource_url(&self, doctype: &str, name: Option<&str>) -> Result<Url, GetProsError> {
        match name {
            Some(name) => self.endpoint(&["api", "resource", doctype, name]),
            None => self.endpoint(&["api", "resource", doctype]),
        }
    }

    pub fn method_url(&self, method: &str) -> Result<Url, GetProsError> {
        self.endpoint(&["api", "method", method])
    }

    /// List URL for one page, or for every record when `page` is `None`
    pub fn list_url(
        &self,
        doctype: &str,
        fields: &[&str],
        filters: &FrappeFilters,
        page: Option<PageRequest>,
    ) -> Result<Url, GetProsError> {
        let mut url = self.resource_url(doctype, None)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("fields", &serde_json::to_string(fields)?);
            query.extend_pairs(filter_pairs(filters)?);
            match page {
                Some(request) => {
                    query.append_pair("limit_start", &request.offset().to_string());
                    query.append_pair("limit_page_length", &request.page_size.to_string());
                }
                // Frappe reads a zero page length as "no limit"
                None => {
                    query.append_pair("limit_page_length", "0");
                }
            }
        }
        Ok(url)
    }

    async fn parse_response<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, GetProsError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response.json().await?);
        }

        let body = response.text().await.unwrap_or_default();
        let message = error_message(&body)
            .unwrap_or_else(|| status.canonical_reason().unwrap_or("request failed").to_string());
        warn!(status = status.as_u16(), %message, "Frappe API call failed");
        Err(GetProsError::Api {
            status: status.as_u16(),
            message,
        })
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, GetProsError> {
        debug!(%url, "GET");
        let response = self.client.get(url).send().await?;
        Self::parse_response(response).await
    }

    pub async fn get_list<T: DeserializeOwned>(
        &self,
        doctype: &str,
        fields: &[&str],
        filters: &FrappeFilters,
        page: Option<PageRequest>,
    ) -> Result<Vec<T>, GetProsError> {
        let url = self.list_url(doctype, fields, filters, page)?;
        let list: ListResponse<T> = self.get_json(url).await?;
        Ok(list.data)
    }

    pub fn count_url(&self, doctype: &str, filters: &FrappeFilters) -> Result<Url, GetProsError> {
        let mut url = self.method_url(GET_COUNT_METHOD)?;
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("doctype", doctype);
            query.extend_pairs(filter_pairs(filters)?);
        }
        Ok(url)
    }

    pub async fn get_count(
        &self,
        doctype: &str,
        filters: &FrappeFilters,
    ) -> Result<usize, GetProsError> {
        let url = self.count_url(doctype, filters)?;
        let count: MethodResponse<usize> = self.get_json(url).await?;
        Ok(count.message)
    }

    /// One page of trainers plus the matching total, for server-side paging
    pub async fn fetch_trainers(
        &self,
        request: PageRequest,
        filter: &TrainerFilter,
    ) -> Result<TrainerPage, GetProsError> {
        let filters = filter.to_frappe_filters();
        let (items, total) = tokio::try_join!(
            self.get_list::<Trainer>(TRAINER_DOCTYPE, &TRAINER_FIELDS, &filters, Some(request)),
            self.get_count(TRAINER_DOCTYPE, &filters),
        )?;

        info!(
            page = request.page,
            page_size = request.page_size,
            loaded = items.len(),
            total,
            "Fetched trainer page"
        );

        Ok(TrainerPage {
            items,
            request: request.with_total(total),
        })
    }

    /// Every trainer matching `filter`, for client-side paging
    pub async fn fetch_all_trainers(
        &self,
        filter: &TrainerFilter,
    ) -> Result<Vec<Trainer>, GetProsError> {
        let trainers = self
            .get_list::<Trainer>(TRAINER_DOCTYPE, &TRAINER_FIELDS, &filter.to_frappe_filters(), None)
            .await?;
        info!(loaded = trainers.len(), "Fetched all trainers");
        Ok(trainers)
    }

    async fn save_child_table<T: Serialize>(
        &self,
        trainer: &str,
        field: &str,
        child_doctype: &str,
        rows: &[T],
    ) -> Result<(), GetProsError> {
        let url = self.resource_url(TRAINER_DOCTYPE, Some(trainer))?;
        let body = listing::child_table_update(field, child_doctype, rows)?;
        debug!(%url, field, rows = rows.len(), "PUT");
        let response = self.client.put(url).json(&body).send().await?;
        let _saved: Value = Self::parse_response(response).await?;
        info!(trainer, field, rows = rows.len(), "Saved child table");
        Ok(())
    }

    pub async fn save_workshops(
        &self,
        trainer: &str,
        workshops: &[Workshop],
    ) -> Result<(), GetProsError> {
        self.save_child_table(trainer, "workshops", WORKSHOP_DOCTYPE, workshops)
            .await
    }

    pub async fn save_case_studies(
        &self,
        trainer: &str,
        case_studies: &[CaseStudy],
    ) -> Result<(), GetProsError> {
        self.save_child_table(trainer, "case_studies", CASE_STUDY_DOCTYPE, case_studies)
            .await
    }

    pub async fn create_credit_order(&self, quote: &Quote) -> Result<CreditOrder, GetProsError> {
        let url = self.method_url(CREDIT_ORDER_METHOD)?;
        let body = json!({
            "credits": quote.credits_granted,
            "package": quote.package.map(|p| p.name),
            "amount_paise": quote.total_paise,
        });
        debug!(%url, credits = quote.credits_granted, "POST");
        let response = self.client.post(url).json(&body).send().await?;
        let order: MethodResponse<CreditOrder> = Self::parse_response(response).await?;
        info!(order_id = %order.message.order_id, "Created credit order");
        Ok(order.message)
    }
}

/// `filters` / `or_filters` query pairs, leaving out empty lists
fn filter_pairs(filters: &FrappeFilters) -> Result<Vec<(&'static str, String)>, GetProsError> {
    let mut pairs = Vec::new();
    if !filters.filters.is_empty() {
        pairs.push(("filters", serde_json::to_string(&filters.filters)?));
    }
    if !filters.or_filters.is_empty() {
        pairs.push(("or_filters", serde_json::to_string(&filters.or_filters)?));
    }
    Ok(pairs)
}

/// Pull a readable message out of a Frappe error body
fn error_message(body: &str) -> Option<String> {
    let value: Value = serde_json::from_str(body).ok()?;
    let message = ["message", "exception", "exc_type"]
        .iter()
        .find_map(|key| value.get(*key).and_then(Value::as_str))?;
    Some(message.chars().take(MAX_ERROR_CHARS).collect())
}
