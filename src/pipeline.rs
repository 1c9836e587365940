use crate::api::client::{build_client, Transport};
use crate::api::menu::collect_leaves;
use crate::api::request::{
    encode, AppIdProvider, AuthRequest, Clock, DeviceProfile, RandomAppId, SystemClock,
};
use crate::api::response::decode;
use crate::api::DATA_URL;
use crate::config::Config;
use crate::dispatch::{Dispatcher, Document, DocumentResult};
use crate::error::Result;
use crate::ocr::{ImageTextExtractor, NoOcr};
use crate::timetable::ColumnMapping;
use log::{debug, info};
use serde::Serialize;
use std::time::Duration;

/// Result of [`DsbClient::fetch_entries`].
///
/// A single document is returned on its own, anything else as a list.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Entries {
    Single(Document),
    Many(Vec<Document>),
}

impl Entries {
    pub fn from_documents(mut documents: Vec<Document>) -> Self {
        if documents.len() == 1 {
            if let Some(document) = documents.pop() {
                return Entries::Single(document);
            }
        }
        Entries::Many(documents)
    }

    pub fn into_vec(self) -> Vec<Document> {
        match self {
            Entries::Single(document) => vec![document],
            Entries::Many(documents) => documents,
        }
    }
}

/// Client for one DSB account.
pub struct DsbClient {
    username: String,
    password: String,
    mapping: ColumnMapping,
    endpoint: String,
    profile: DeviceProfile,
    transport: Box<dyn Transport>,
    ids: Box<dyn AppIdProvider>,
    clock: Box<dyn Clock>,
    ocr: Box<dyn ImageTextExtractor>,
}

impl DsbClient {
    pub fn new(
        username: &str,
        password: &str,
        mapping: ColumnMapping,
        transport: impl Transport + 'static,
    ) -> Self {
        Self {
            username: username.to_string(),
            password: password.to_string(),
            mapping,
            endpoint: DATA_URL.to_string(),
            profile: DeviceProfile::default(),
            transport: Box::new(transport),
            ids: Box::new(RandomAppId),
            clock: Box::new(SystemClock),
            ocr: Box::new(NoOcr),
        }
    }

    /// Build a client with the reqwest transport configured from `config`.
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = build_client(Duration::from_secs(config.timeout_secs), config.max_retries)?;

        Ok(Self::new(&config.username, &config.password, config.columns.clone(), transport)
            .with_endpoint(&config.endpoint))
    }

    pub fn with_endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn with_profile(mut self, profile: DeviceProfile) -> Self {
        self.profile = profile;
        self
    }

    pub fn with_app_ids(mut self, ids: impl AppIdProvider + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    pub fn with_ocr(mut self, ocr: impl ImageTextExtractor + 'static) -> Self {
        self.ocr = Box::new(ocr);
        self
    }

    pub fn mapping(&self) -> &ColumnMapping {
        &self.mapping
    }

    /// Ask the server for its menu and return the document URLs in it.
    pub async fn fetch_leaves(&self) -> Result<Vec<String>> {
        let request = AuthRequest::new(
            &self.username,
            &self.password,
            &self.profile,
            self.ids.as_ref(),
            self.clock.as_ref(),
        );
        let body = encode(&request)?.to_body();
        debug!("Requesting data for user {} from {}", self.username, self.endpoint);

        let raw = self.transport.post_json(&self.endpoint, &body).await?;
        let response = decode(&raw)?;

        collect_leaves(&response.result_menu_items)
    }

    /// Fetch every document, keeping failed ones as errors in their slot.
    pub async fn fetch_documents(&self, images: bool) -> Result<Vec<DocumentResult>> {
        let leaves = self.fetch_leaves().await?;

        let dispatcher = Dispatcher {
            transport: self.transport.as_ref(),
            mapping: &self.mapping,
            ocr: self.ocr.as_ref(),
        };

        Ok(dispatcher.dispatch(&leaves, images).await)
    }

    /// Fetch and parse all documents of the account.
    ///
    /// Protocol errors fail the call. Documents that cannot be fetched or
    /// parsed are left out.
    pub async fn fetch_entries(&self, images: bool) -> Result<Entries> {
        let results = self.fetch_documents(images).await?;
        let total = results.len();

        let documents: Vec<Document> = results.into_iter().filter_map(|r| r.result.ok()).collect();
        info!("Fetched {} of {} documents", documents.len(), total);

        Ok(Entries::from_documents(documents))
    }
}
