/*!
# Overview
s3probe-rs is an on-demand Prometheus exporter for S3-compatible object
storage. Each `GET /probe` request lists the objects of one or all buckets
reachable with the supplied credentials and reports per-(bucket, prefix)
object count and cumulative size as gauges in the text exposition format.

## Features
- **Pull-based probing**: no persistent agent or state; every scrape runs a
  fresh listing pass against the storage provider
- **Prefix grouping**: object keys bucketed into synthetic "folders" up to a
  requested depth, each group reported as its own sample pair
- **Provider pass-through**: endpoint, region, path-style addressing, and
  basic-auth credentials all come from the probe request
- **Process self-metrics**: `GET /metrics` serves request counters and
  process stats from a long-lived registry separate from probe samples
- **Library-First**: the s3probe binary is a thin wrapper over this crate;
  the probe orchestrator runs against any [`storage::ObjectStore`]

## As a Library

```toml
[dependencies]
s3probe-rs = "0.1"
tokio = { version = "1", features = ["full"] }
```

```no_run
// use s3probe_rs::probe::{ProbeQuery, run_probe};
// use s3probe_rs::storage::{S3StoreFactory, StoreFactory};
// use s3probe_rs::types::S3Credentials;
//
// #[tokio::main]
// async fn main() {
//     let pairs = [("bucket", "my-bucket"), ("delimiter", "/"), ("depth", "1")];
//     let query = ProbeQuery::from_pairs(pairs, S3Credentials::Anonymous).unwrap();
//
//     let factory = S3StoreFactory::new(1000);
//     let store = factory.create(&query.target()).await.unwrap();
//
//     match run_probe(store.as_ref(), &query).await {
//         Ok(body) => print!("{body}"),
//         Err(e) => eprintln!("{e}"),
//     }
// }
```
*/

pub mod config;
pub mod metrics;
pub mod probe;
pub mod server;
pub mod storage;
pub mod types;

#[cfg(test)]
pub(crate) mod test_utils;

pub use config::args::CLIArgs;
pub use probe::{ProbeQuery, run_probe};
pub use types::error::ProbeError;
pub use types::token::{ShutdownToken, create_shutdown_token};
