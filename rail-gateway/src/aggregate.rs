//! Station and route lookups.
//!
//! A route lookup is one search followed by one detail request per matched
//! service. The detail requests run concurrently (the upstream client caps
//! how many are in flight) and are reassembled in search order. If any of
//! them fails the whole lookup fails: a journey list with holes in it looks
//! complete to a consumer.

use chrono::{Local, NaiveDate};
use futures::future::join_all;
use tracing::{debug, info, warn};

use crate::domain::{ServiceUid, StationCode};
use crate::rtt::{RttClient, ServiceDetail, ServiceSummary, StationSearch, UpstreamError};

/// Source of upstream rail data.
///
/// Implemented by [`RttClient`]; tests substitute in-memory sources.
pub trait RailSource {
    /// Services calling at a station.
    fn station_search(
        &self,
        station: &StationCode,
    ) -> impl Future<Output = Result<StationSearch, UpstreamError>> + Send;

    /// Services calling at `from` and then `to`.
    fn route_search(
        &self,
        from: &StationCode,
        to: &StationCode,
    ) -> impl Future<Output = Result<StationSearch, UpstreamError>> + Send;

    /// Full itinerary of one service run on `date`.
    fn service_detail(
        &self,
        uid: &ServiceUid,
        date: NaiveDate,
    ) -> impl Future<Output = Result<ServiceDetail, UpstreamError>> + Send;
}

impl RailSource for RttClient {
    async fn station_search(
        &self,
        station: &StationCode,
    ) -> Result<StationSearch, UpstreamError> {
        RttClient::station_search(self, station).await
    }

    async fn route_search(
        &self,
        from: &StationCode,
        to: &StationCode,
    ) -> Result<StationSearch, UpstreamError> {
        RttClient::route_search(self, from, to).await
    }

    async fn service_detail(
        &self,
        uid: &ServiceUid,
        date: NaiveDate,
    ) -> Result<ServiceDetail, UpstreamError> {
        RttClient::service_detail(self, uid, date).await
    }
}

/// Errors from a lookup.
#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    /// The search request itself failed
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// At least one detail request of a route lookup failed
    #[error("{failed} of {total} service details could not be fetched; first failure {uid}: {source}")]
    PartialAggregation {
        uid: String,
        failed: usize,
        total: usize,
        #[source]
        source: UpstreamError,
    },
}

impl LookupError {
    /// The upstream failure behind this error.
    pub fn upstream(&self) -> &UpstreamError {
        match self {
            LookupError::Upstream(e) => e,
            LookupError::PartialAggregation { source, .. } => source,
        }
    }
}

/// Runs lookups against a [`RailSource`].
#[derive(Debug, Clone)]
pub struct Aggregator<S> {
    source: S,
}

impl<S: RailSource> Aggregator<S> {
    pub fn new(source: S) -> Self {
        Self { source }
    }

    /// Services calling at a station, as returned by the upstream.
    pub async fn lookup_by_station(
        &self,
        station: &StationCode,
    ) -> Result<StationSearch, LookupError> {
        let search = self.source.station_search(station).await?;
        debug!(
            station = %station,
            services = search.services().len(),
            "station lookup complete"
        );
        Ok(search)
    }

    /// Full itineraries of today's services from `origin` to `destination`.
    pub async fn lookup_by_route(
        &self,
        origin: &StationCode,
        destination: &StationCode,
    ) -> Result<Vec<ServiceDetail>, LookupError> {
        let today = Local::now().date_naive();
        self.lookup_by_route_on(origin, destination, today).await
    }

    /// Full itineraries of the services from `origin` to `destination`,
    /// with details fetched for `date`.
    ///
    /// Issues exactly one search request plus one detail request per
    /// service in the search result. The returned list is in search order.
    pub async fn lookup_by_route_on(
        &self,
        origin: &StationCode,
        destination: &StationCode,
        date: NaiveDate,
    ) -> Result<Vec<ServiceDetail>, LookupError> {
        let search = self.source.route_search(origin, destination).await?;
        let summaries = search.services();

        if summaries.is_empty() {
            debug!(origin = %origin, destination = %destination, "no services on route");
            return Ok(Vec::new());
        }

        let fetches = summaries
            .iter()
            .map(|summary| self.fetch_detail(summary, date));
        let results = join_all(fetches).await;

        let total = results.len();
        let mut details = Vec::with_capacity(total);
        let mut first_failure = None;
        let mut failed = 0;

        for (summary, result) in summaries.iter().zip(results) {
            match result {
                Ok(detail) => details.push(detail),
                Err(e) => {
                    failed += 1;
                    let uid = summary.service_uid.as_deref().unwrap_or_default().to_string();
                    warn!(uid = %uid, error = %e, "service detail fetch failed");
                    if first_failure.is_none() {
                        first_failure = Some((uid, e));
                    }
                }
            }
        }

        if let Some((uid, source)) = first_failure {
            return Err(LookupError::PartialAggregation {
                uid,
                failed,
                total,
                source,
            });
        }

        info!(
            origin = %origin,
            destination = %destination,
            services = total,
            "route lookup complete"
        );
        Ok(details)
    }

    async fn fetch_detail(
        &self,
        summary: &ServiceSummary,
        date: NaiveDate,
    ) -> Result<ServiceDetail, UpstreamError> {
        let raw = summary.service_uid.as_deref().unwrap_or_default().to_string();
        let uid = ServiceUid::new(raw.clone()).map_err(|_| UpstreamError::DetailUnavailable {
            uid: raw,
            reason: "search result has no usable service UID",
        })?;
        self.source.service_detail(&uid, date).await
    }
}
