//! Courier CLI - Command-line interface for the Courier message queue

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tabled::{Table, Tabled};

const DEFAULT_RPC_URL: &str = "http://127.0.0.1:9527";

#[derive(Parser)]
#[command(name = "courier")]
#[command(about = "Courier message queue CLI", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// RPC server URL
    #[arg(long, env = "COURIER_RPC_URL", default_value = DEFAULT_RPC_URL, global = true)]
    rpc_url: String,

    /// Access key name
    #[arg(long, env = "COURIER_ACCESS_KEY", default_value = "", global = true)]
    access_key: String,

    /// Access key secret
    #[arg(long, env = "COURIER_SECRET", default_value = "", hide_env_values = true, global = true)]
    secret: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a queue
    CreateQueue {
        /// Tag as key=value (repeatable)
        #[arg(short, long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },

    /// Delete a queue and purge its messages
    DeleteQueue {
        /// Queue ID
        queue_id: String,
    },

    /// List queues, optionally only those carrying every given tag
    DescribeQueues {
        /// Tag as key=value (repeatable)
        #[arg(short, long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },

    /// Show pending message count
    Status {
        /// Queue ID
        queue_id: String,
    },

    /// Delete every message in a queue
    Purge {
        /// Queue ID
        queue_id: String,
    },

    /// Replace a queue's tags (no --tag clears them)
    UpdateTags {
        /// Queue ID
        queue_id: String,

        /// Tag as key=value (repeatable)
        #[arg(short, long = "tag", value_parser = parse_tag)]
        tags: Vec<(String, String)>,
    },

    /// Push a message
    Push {
        /// Queue ID
        queue_id: String,

        /// Message body
        body: String,

        /// MIME type of the body
        #[arg(short, long, default_value = "text/plain")]
        content_type: String,
    },

    /// Pop the oldest message
    Pop {
        /// Queue ID
        queue_id: String,
    },

    /// Print metrics in Prometheus text format
    Metrics,
}

fn parse_tag(raw: &str) -> std::result::Result<(String, String), String> {
    raw.split_once('=')
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))
}

fn tags_json(tags: &[(String, String)]) -> Value {
    Value::Array(
        tags.iter()
            .map(|(key, value)| json!({"key": key, "value": value}))
            .collect(),
    )
}

#[derive(Serialize)]
struct JsonRpcRequest {
    jsonrpc: String,
    method: String,
    params: Value,
    id: u64,
}

#[derive(Deserialize)]
struct JsonRpcResponse {
    #[allow(dead_code)]
    jsonrpc: String,
    #[allow(dead_code)]
    id: u64,
    #[serde(default)]
    result: Value,
    error: Option<JsonRpcError>,
}

#[derive(Deserialize)]
struct JsonRpcError {
    code: i32,
    message: String,
}

#[derive(Deserialize)]
struct Tag {
    key: String,
    value: String,
}

#[derive(Deserialize)]
struct Queue {
    id: String,
    tags: Vec<Tag>,
}

#[derive(Tabled)]
struct QueueRow {
    id: String,
    tags: String,
}

impl From<Queue> for QueueRow {
    fn from(queue: Queue) -> Self {
        let tags = queue
            .tags
            .iter()
            .map(|t| format!("{}={}", t.key, t.value))
            .collect::<Vec<_>>()
            .join(", ");
        Self { id: queue.id, tags }
    }
}

#[derive(Deserialize, Tabled)]
struct PoppedMessage {
    id: String,
    content_type: String,
    created_at: String,
    body: String,
}

/// JSON-RPC client carrying the caller's credentials
struct Client {
    url: String,
    access_key: String,
    secret: String,
    http: reqwest::Client,
}

impl Client {
    /// Call `method`; `params` must be a JSON object, `auth` is added to it
    async fn call(&self, method: &str, mut params: Value) -> Result<Value> {
        params["auth"] = json!({"access_key": self.access_key, "secret": self.secret});

        let request = JsonRpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: 1,
        };

        let response: JsonRpcResponse = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .context("Failed to connect to daemon")?
            .json()
            .await
            .context("Failed to parse response")?;

        if let Some(error) = response.error {
            anyhow::bail!("RPC error ({}): {}", error.code, error.message);
        }

        Ok(response.result)
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let client = Client {
        url: cli.rpc_url,
        access_key: cli.access_key,
        secret: cli.secret,
        http: reqwest::Client::new(),
    };

    match cli.command {
        Commands::CreateQueue { tags } => {
            let result = client
                .call("queue.create.v1", json!({ "tags": tags_json(&tags) }))
                .await?;
            let queue: Queue = serde_json::from_value(result)?;

            println!("{}", "✓ Queue created".green().bold());
            println!();
            println!("{}", Table::new(vec![QueueRow::from(queue)]));
        }

        Commands::DeleteQueue { queue_id } => {
            client
                .call("queue.delete.v1", json!({ "queue_id": queue_id }))
                .await?;
            println!("{}", format!("✓ Queue {} deleted", queue_id).green().bold());
        }

        Commands::DescribeQueues { tags } => {
            let result = client
                .call("queue.describe.v1", json!({ "tags": tags_json(&tags) }))
                .await?;
            let queues: Vec<Queue> = serde_json::from_value(result)?;

            if queues.is_empty() {
                println!("{}", "No queues".yellow());
            } else {
                let rows: Vec<QueueRow> = queues.into_iter().map(QueueRow::from).collect();
                println!("{}", Table::new(rows));
            }
        }

        Commands::Status { queue_id } => {
            let result = client
                .call("queue.status.v1", json!({ "queue_id": queue_id }))
                .await?;

            println!("{}", format!("Queue {}", queue_id).cyan().bold());
            println!("  {} {}", "Pending messages:".bold(), result["message_count"]);
        }

        Commands::Purge { queue_id } => {
            client
                .call("queue.purge.v1", json!({ "queue_id": queue_id }))
                .await?;
            println!("{}", format!("✓ Queue {} purged", queue_id).green().bold());
        }

        Commands::UpdateTags { queue_id, tags } => {
            client
                .call(
                    "queue.tags.update.v1",
                    json!({ "queue_id": queue_id, "tags": tags_json(&tags) }),
                )
                .await?;
            println!("{}", format!("✓ Tags of {} replaced", queue_id).green().bold());
        }

        Commands::Push {
            queue_id,
            body,
            content_type,
        } => {
            let result = client
                .call(
                    "message.push.v1",
                    json!({ "queue_id": queue_id, "content_type": content_type, "body": body }),
                )
                .await?;

            println!("{}", "✓ Message pushed".green().bold());
            println!("  {} {}", "Message ID:".bold(), result["message_id"]);
        }

        Commands::Pop { queue_id } => {
            let result = client
                .call("message.pop.v1", json!({ "queue_id": queue_id }))
                .await?;

            match serde_json::from_value::<Option<PoppedMessage>>(result)? {
                Some(message) => println!("{}", Table::new(vec![message])),
                None => println!("{}", "Queue is empty".yellow()),
            }
        }

        Commands::Metrics => {
            let result = client.call("admin.metrics.v1", json!({})).await?;
            print!("{}", result.as_str().unwrap_or_default());
        }
    }

    Ok(())
}
