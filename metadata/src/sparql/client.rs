//! Triplestore client: existence checks, chunked inserts, deletes, uploads.

use cmeo_ontology::serializer::{ntriples, trig};
use cmeo_ontology::{Dataset, Term, Triple};
use percent_encoding::{utf8_percent_encode, NON_ALPHANUMERIC};
use tracing::{debug, error, info, warn};

use super::config::SparqlConfig;
use super::query;
use super::transport::{HttpResponse, HttpTransport, ReqwestTransport};
use crate::error::SparqlError;
use crate::normalize::normalize_text;

const SPARQL_RESULTS_JSON: &str = "application/sparql-results+json";
const TRIG: &str = "application/trig";

/// Outcome of one `INSERT DATA` request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkOutcome {
    /// Zero-based chunk number.
    pub index: usize,
    /// Triples in this chunk.
    pub triples: usize,
    /// HTTP status returned.
    pub status: u16,
}

impl ChunkOutcome {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A chunk whose request got no response, ending the insert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Interruption {
    /// Zero-based chunk number.
    pub index: usize,
    /// Triples in this chunk.
    pub triples: usize,
    /// Transport error message.
    pub reason: String,
}

/// Per-chunk results of a chunked insert.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InsertReport {
    /// Triples considered.
    pub total: usize,
    /// One entry per request answered, in order.
    pub chunks: Vec<ChunkOutcome>,
    /// Set when a request failed to complete; later chunks were not sent.
    pub interrupted: Option<Interruption>,
}

impl InsertReport {
    /// Returns true when every chunk was answered with success (vacuously
    /// for zero chunks).
    #[must_use]
    pub fn all_succeeded(&self) -> bool {
        self.interrupted.is_none() && self.chunks.iter().all(ChunkOutcome::is_success)
    }

    /// Triples in chunks the store accepted.
    #[must_use]
    pub fn applied(&self) -> usize {
        self.chunks
            .iter()
            .filter(|c| c.is_success())
            .map(|c| c.triples)
            .sum()
    }

    /// Chunks that failed.
    pub fn failed(&self) -> impl Iterator<Item = &ChunkOutcome> {
        self.chunks.iter().filter(|c| !c.is_success())
    }
}

/// Outcome of [`SparqlClient::delete_triples`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    /// The delete was sent; carries the HTTP status.
    Sent {
        /// HTTP status returned.
        status: u16,
    },
    /// The graph does not exist, so nothing was sent.
    GraphMissing,
}

/// Blocking SPARQL 1.1 protocol client.
#[derive(Debug)]
pub struct SparqlClient<T = ReqwestTransport> {
    config: SparqlConfig,
    transport: T,
}

impl SparqlClient<ReqwestTransport> {
    /// Creates a client over HTTP with the configured timeout.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: SparqlConfig) -> Result<Self, SparqlError> {
        let transport = ReqwestTransport::new(config.timeout())?;
        Ok(Self { config, transport })
    }
}

impl<T: HttpTransport> SparqlClient<T> {
    /// Creates a client over an arbitrary transport.
    pub fn with_transport(config: SparqlConfig, transport: T) -> Self {
        Self { config, transport }
    }

    /// The client configuration.
    #[must_use]
    pub fn config(&self) -> &SparqlConfig {
        &self.config
    }

    /// The underlying transport.
    #[must_use]
    pub fn transport(&self) -> &T {
        &self.transport
    }

    fn ask(&self, sparql: &str) -> Result<bool, SparqlError> {
        debug!(endpoint = %self.config.query_endpoint, query = %sparql, "ASK");
        let response = self.transport.post_form(
            &self.config.query_endpoint,
            &[("query", sparql)],
            Some(SPARQL_RESULTS_JSON),
        )?;
        if !response.is_success() {
            error!(status = response.status, body = %response.body, "ASK failed");
            return Err(SparqlError::Status {
                status: response.status,
                body: response.body,
            });
        }
        query::parse_ask(&response.body)
    }

    fn update(&self, sparql: &str) -> Result<HttpResponse, SparqlError> {
        debug!(endpoint = %self.config.update_endpoint, bytes = sparql.len(), "UPDATE");
        let response = self
            .transport
            .post_form(&self.config.update_endpoint, &[("update", sparql)], None)?;
        if !response.is_success() {
            error!(status = response.status, body = %response.body, "update failed");
        }
        Ok(response)
    }

    /// Returns whether `graph` holds at least one triple.
    ///
    /// # Errors
    ///
    /// Returns an error on transport failure, a non-success status, or an
    /// unparseable result.
    pub fn graph_exists(&self, graph: &str) -> Result<bool, SparqlError> {
        let exists = self.ask(&query::ask_graph(graph))?;
        debug!(graph, exists, "graph existence");
        Ok(exists)
    }

    /// Returns whether `graph` holds `(subject, predicate, object)`.
    ///
    /// # Errors
    ///
    /// See [`SparqlClient::graph_exists`].
    pub fn triple_exists(
        &self,
        graph: &str,
        subject: &str,
        predicate: &str,
        object: &Term,
    ) -> Result<bool, SparqlError> {
        self.ask(&query::ask_triple(graph, subject, predicate, object))
    }

    /// Returns whether `graph` holds a data element whose identifier is the
    /// normalized `variable_name`. A name that normalizes to nothing is
    /// reported absent without a request.
    ///
    /// # Errors
    ///
    /// See [`SparqlClient::graph_exists`].
    pub fn variable_exists(&self, graph: &str, variable_name: &str) -> Result<bool, SparqlError> {
        let Some(identifier) = normalize_text(variable_name) else {
            warn!(graph, "variable name is empty");
            return Ok(false);
        };
        let exists = self.ask(&query::ask_variable(graph, &identifier))?;
        if exists {
            info!(graph, variable = %identifier, "variable exists");
        }
        Ok(exists)
    }

    /// Deletes every `subject predicate ?o` in `graph`, if the graph exists.
    ///
    /// `subject` and `predicate` are SPARQL patterns (`?s`, `<iri>`).
    ///
    /// # Errors
    ///
    /// Returns an error if the existence check or the delete request fails
    /// to complete.
    pub fn delete_triples(
        &self,
        graph: &str,
        subject: &str,
        predicate: &str,
    ) -> Result<DeleteOutcome, SparqlError> {
        if !self.graph_exists(graph)? {
            info!(graph, "graph does not exist; nothing to delete");
            return Ok(DeleteOutcome::GraphMissing);
        }
        let response = self.update(&query::delete_where(graph, subject, predicate))?;
        info!(graph, status = response.status, "delete sent");
        Ok(DeleteOutcome::Sent {
            status: response.status,
        })
    }

    /// Inserts `triples` into `graph` with the configured chunk size.
    ///
    /// # Errors
    ///
    /// See [`SparqlClient::insert_triples_chunked`].
    pub fn insert_triples<'a>(
        &self,
        graph: &str,
        triples: impl IntoIterator<Item = &'a Triple>,
    ) -> Result<InsertReport, SparqlError> {
        self.insert_triples_chunked(graph, triples, self.config.chunk_size)
    }

    /// Inserts `triples` into `graph`, at most `chunk_size` per
    /// `INSERT DATA` request, one request at a time.
    ///
    /// A chunk rejected by the server is recorded in the report and the
    /// remaining chunks are still sent. A chunk that gets no response is
    /// recorded as [`InsertReport::interrupted`] and no further chunks are
    /// sent. Nothing is sent for zero triples.
    ///
    /// # Errors
    ///
    /// Returns [`SparqlError::InvalidChunkSize`] for a zero chunk size.
    pub fn insert_triples_chunked<'a>(
        &self,
        graph: &str,
        triples: impl IntoIterator<Item = &'a Triple>,
        chunk_size: usize,
    ) -> Result<InsertReport, SparqlError> {
        if chunk_size == 0 {
            return Err(SparqlError::InvalidChunkSize);
        }
        let lines = ntriples::to_lines(triples);
        let mut report = InsertReport {
            total: lines.len(),
            ..InsertReport::default()
        };
        if lines.is_empty() {
            info!(graph, "no triples to insert");
            return Ok(report);
        }

        let mut sent = 0;
        for (index, chunk) in lines.chunks(chunk_size).enumerate() {
            let response = match self.update(&query::insert_data(graph, chunk)) {
                Ok(response) => response,
                Err(err) => {
                    error!(graph, chunk = index, inserted = sent, error = %err, "insert interrupted");
                    report.interrupted = Some(Interruption {
                        index,
                        triples: chunk.len(),
                        reason: err.to_string(),
                    });
                    break;
                }
            };
            sent += chunk.len();
            info!(graph, inserted = sent, total = lines.len(), status = response.status, "inserted chunk");
            report.chunks.push(ChunkOutcome {
                index,
                triples: chunk.len(),
                status: response.status,
            });
        }
        Ok(report)
    }

    /// Uploads `dataset` as TriG to `{store_endpoint}/store`, into `graph`
    /// when given. Returns whether the store accepted it.
    ///
    /// # Errors
    ///
    /// Returns an error only if no response was received.
    pub fn publish_graph(&self, dataset: &Dataset, graph: Option<&str>) -> Result<bool, SparqlError> {
        let url = store_url(&self.config.store_endpoint, graph);
        info!(url = %url, statements = dataset.len(), "uploading TriG");
        let response = self.transport.post_body(&url, TRIG, trig::to_trig(dataset))?;
        if !response.is_success() {
            error!(status = response.status, body = %response.body, "failed to upload data");
        }
        Ok(response.is_success())
    }
}

fn store_url(store_endpoint: &str, graph: Option<&str>) -> String {
    let mut url = format!("{}/store", store_endpoint.trim_end_matches('/'));
    if let Some(graph) = graph {
        url.push_str("?graph=");
        url.extend(utf8_percent_encode(graph, NON_ALPHANUMERIC));
    }
    url
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::collections::VecDeque;

    use super::*;
    use cmeo_ontology::iris;

    #[derive(Debug, Clone, PartialEq)]
    struct Sent {
        url: String,
        form: Vec<(String, String)>,
        accept: Option<String>,
        content_type: Option<String>,
        body: String,
    }

    /// Records every request and replays queued responses (200 when empty).
    /// A queued `None` fails the request as if the connection dropped.
    #[derive(Default)]
    struct Recording {
        sent: RefCell<Vec<Sent>>,
        replies: RefCell<VecDeque<Option<HttpResponse>>>,
    }

    impl Recording {
        fn reply(self, status: u16, body: &str) -> Self {
            self.replies.borrow_mut().push_back(Some(HttpResponse {
                status,
                body: body.to_owned(),
            }));
            self
        }

        fn drop_connection(self) -> Self {
            self.replies.borrow_mut().push_back(None);
            self
        }

        fn next(&self, url: &str) -> Result<HttpResponse, SparqlError> {
            match self.replies.borrow_mut().pop_front() {
                Some(Some(response)) => Ok(response),
                Some(None) => {
                    let source = reqwest::blocking::Client::new()
                        .get("not a url")
                        .send()
                        .unwrap_err();
                    Err(SparqlError::Transport {
                        url: url.to_owned(),
                        source,
                    })
                }
                None => Ok(HttpResponse {
                    status: 200,
                    body: String::new(),
                }),
            }
        }
    }

    impl HttpTransport for Recording {
        fn post_form(
            &self,
            url: &str,
            form: &[(&str, &str)],
            accept: Option<&str>,
        ) -> Result<HttpResponse, SparqlError> {
            self.sent.borrow_mut().push(Sent {
                url: url.to_owned(),
                form: form.iter().map(|(k, v)| ((*k).to_owned(), (*v).to_owned())).collect(),
                accept: accept.map(str::to_owned),
                content_type: None,
                body: String::new(),
            });
            self.next(url)
        }

        fn post_body(
            &self,
            url: &str,
            content_type: &str,
            body: String,
        ) -> Result<HttpResponse, SparqlError> {
            self.sent.borrow_mut().push(Sent {
                url: url.to_owned(),
                form: Vec::new(),
                accept: None,
                content_type: Some(content_type.to_owned()),
                body,
            });
            self.next(url)
        }
    }

    fn config() -> SparqlConfig {
        SparqlConfig::new("http://ts/query", "http://ts/update", "http://ts/")
    }

    fn triples(n: usize) -> Vec<Triple> {
        (0..n)
            .map(|i| {
                Triple::new(
                    Term::iri(format!("https://w3id.org/CMEO/v{i}")),
                    iris::RDF_TYPE,
                    Term::iri("https://w3id.org/CMEO/data_element"),
                )
            })
            .collect()
    }

    #[test]
    fn insert_splits_into_ceil_n_over_chunk_requests() {
        let client = SparqlClient::with_transport(config(), Recording::default());
        let data = triples(1201);
        let report = client.insert_triples("http://g", &data).unwrap();

        let sent = client.transport().sent.borrow();
        assert_eq!(sent.len(), 3);
        assert_eq!(report.total, 1201);
        assert_eq!(
            report.chunks.iter().map(|c| c.triples).collect::<Vec<_>>(),
            vec![500, 500, 201]
        );
        for request in sent.iter() {
            assert_eq!(request.url, "http://ts/update");
            let (key, update) = &request.form[0];
            assert_eq!(key, "update");
            assert!(update.starts_with("INSERT DATA {\n  GRAPH <http://g> {"));
            assert!(update.lines().filter(|l| l.trim_end().ends_with(" .")).count() <= 500);
        }
    }

    #[test]
    fn failed_chunk_does_not_stop_later_chunks() {
        let transport = Recording::default().reply(200, "").reply(500, "boom").reply(204, "");
        let client = SparqlClient::with_transport(config(), transport);
        let data = triples(5);
        let report = client.insert_triples_chunked("http://g", &data, 2).unwrap();
        assert_eq!(report.chunks.len(), 3);
        assert!(!report.all_succeeded());
        assert_eq!(report.failed().map(|c| c.index).collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn dropped_connection_keeps_outcomes_of_applied_chunks() {
        let transport = Recording::default().reply(204, "").drop_connection();
        let client = SparqlClient::with_transport(config(), transport);
        let data = triples(5);
        let report = client.insert_triples_chunked("http://g", &data, 2).unwrap();

        assert_eq!(client.transport().sent.borrow().len(), 2);
        assert_eq!(
            report.chunks,
            vec![ChunkOutcome {
                index: 0,
                triples: 2,
                status: 204
            }]
        );
        let interrupted = report.interrupted.as_ref().unwrap();
        assert_eq!((interrupted.index, interrupted.triples), (1, 2));
        assert!(interrupted.reason.contains("http://ts/update"));
        assert_eq!(report.applied(), 2);
        assert!(!report.all_succeeded());
    }

    #[test]
    fn zero_triples_send_nothing_and_zero_chunk_is_rejected() {
        let client = SparqlClient::with_transport(config(), Recording::default());
        let report = client.insert_triples("http://g", &[]).unwrap();
        assert_eq!(report, InsertReport::default());
        assert!(client.transport().sent.borrow().is_empty());
        assert!(matches!(
            client.insert_triples_chunked("http://g", &triples(1), 0),
            Err(SparqlError::InvalidChunkSize)
        ));
    }

    #[test]
    fn graph_exists_posts_ask_to_query_endpoint() {
        let transport = Recording::default().reply(200, r#"{"head":{},"boolean":true}"#);
        let client = SparqlClient::with_transport(config(), transport);
        assert!(client.graph_exists("http://g").unwrap());

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[0].url, "http://ts/query");
        assert_eq!(sent[0].accept.as_deref(), Some(SPARQL_RESULTS_JSON));
        assert_eq!(sent[0].form[0].0, "query");
        assert!(sent[0].form[0].1.contains("GRAPH <http://g> { ?s ?p ?o }"));
    }

    #[test]
    fn ask_error_status_is_an_error() {
        let client = SparqlClient::with_transport(config(), Recording::default().reply(503, "down"));
        assert!(matches!(
            client.graph_exists("http://g"),
            Err(SparqlError::Status { status: 503, .. })
        ));
    }

    #[test]
    fn delete_skips_missing_graph() {
        let client = SparqlClient::with_transport(config(), Recording::default().reply(200, r#"{"boolean":false}"#));
        assert_eq!(client.delete_triples("http://g", "?s", "?p").unwrap(), DeleteOutcome::GraphMissing);
        assert_eq!(client.transport().sent.borrow().len(), 1);
    }

    #[test]
    fn delete_sent_when_graph_present() {
        let transport = Recording::default().reply(200, r#"{"boolean":true}"#).reply(204, "");
        let client = SparqlClient::with_transport(config(), transport);
        let outcome = client.delete_triples("http://g", "<http://s>", "?p").unwrap();
        assert_eq!(outcome, DeleteOutcome::Sent { status: 204 });

        let sent = client.transport().sent.borrow();
        assert_eq!(sent[1].url, "http://ts/update");
        assert!(sent[1].form[0].1.contains("{ <http://s> ?p ?o . }"));
    }

    #[test]
    fn triple_and_variable_checks() {
        let transport = Recording::default()
            .reply(200, r#"{"boolean":true}"#)
            .reply(200, r#"{"boolean":false}"#);
        let client = SparqlClient::with_transport(config(), transport);
        assert!(client
            .triple_exists("http://g", "http://s", "http://p", &Term::literal("x"))
            .unwrap());
        assert!(!client.variable_exists("http://g", "Body Mass Index").unwrap());
        assert!(!client.variable_exists("http://g", "nan").unwrap());

        let sent = client.transport().sent.borrow();
        assert_eq!(sent.len(), 2);
        assert!(sent[1].form[0].1.contains("dc:identifier \"body_mass_index\""));
    }

    #[test]
    fn publish_posts_trig_to_store() {
        let client = SparqlClient::with_transport(config(), Recording::default().reply(400, "bad"));
        let mut ds = Dataset::new();
        ds.bind("cmeo", "https://w3id.org/CMEO/");
        ds.add(triples(1).remove(0), Some("https://w3id.org/CMEO/graph/c1"));
        assert!(!client.publish_graph(&ds, Some("https://w3id.org/CMEO/graph/c1")).unwrap());

        let sent = client.transport().sent.borrow();
        assert_eq!(
            sent[0].url,
            "http://ts/store?graph=https%3A%2F%2Fw3id%2Eorg%2FCMEO%2Fgraph%2Fc1"
        );
        assert_eq!(sent[0].content_type.as_deref(), Some("application/trig"));
        assert!(sent[0].body.starts_with("@prefix cmeo:"));
    }

    #[test]
    fn store_url_without_graph() {
        assert_eq!(store_url("http://ts", None), "http://ts/store");
    }
}
