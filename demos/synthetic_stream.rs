//! Synthetic capture broadcast demo
//!
//! Run with: cargo run --example synthetic_stream [BIND_ADDR]
//!
//! Examples:
//!   cargo run --example synthetic_stream                  # binds to 0.0.0.0:8090
//!   cargo run --example synthetic_stream 127.0.0.1:9000
//!
//! Stands in for the real collaborators on both sides of the pipeline:
//! two producer tasks generate fake JPEG frames (15 fps) and PCM blocks
//! in place of a camera and microphone, and a length-prefixed TCP
//! fan-out stands in for the WebSocket layer. Each accepted connection
//! becomes one pipeline client and receives every broadcast message as
//! `u32 length (LE) ++ wire message`.
//!
//! Watch the stream with e.g.:
//!   cargo run --example synthetic_stream &
//!   nc 127.0.0.1 8090 | xxd | head

use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use bytes::Bytes;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::OwnedWriteHalf;
use tokio::net::TcpListener;
use tokio::sync::Mutex;

use camcast_rs::{
    Broadcaster, CaptureEvent, CaptureSink, ClientId, ClientRegistry, MediaTransport,
    PipelineConfig, TransportError,
};

const FPS: u64 = 15;
const WIDTH: u16 = 640;
const HEIGHT: u16 = 480;
const PCM_BLOCK_SAMPLES: usize = 2048;
const PCM_SAMPLE_RATE: u64 = 44_100;

/// Length-prefixed TCP fan-out: one write half per connected client
///
/// Each peer gets its own lock so a stalled socket only blocks its own
/// sender, never the other clients.
struct TcpFanout {
    peers: Mutex<HashMap<ClientId, Arc<Mutex<OwnedWriteHalf>>>>,
}

impl TcpFanout {
    fn new() -> Self {
        Self {
            peers: Mutex::new(HashMap::new()),
        }
    }

    async fn attach(&self, client: ClientId, writer: OwnedWriteHalf) {
        self.peers
            .lock()
            .await
            .insert(client, Arc::new(Mutex::new(writer)));
    }

    async fn detach(&self, client: ClientId) {
        self.peers.lock().await.remove(&client);
    }
}

impl MediaTransport for TcpFanout {
    async fn deliver(&self, client: ClientId, message: Bytes) -> Result<(), TransportError> {
        let writer = self
            .peers
            .lock()
            .await
            .get(&client)
            .cloned()
            .ok_or(TransportError::Closed)?;

        let mut writer = writer.lock().await;
        writer.write_u32_le(message.len() as u32).await?;
        writer.write_all(&message).await?;
        Ok(())
    }
}

fn now_secs() -> f64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or(0.0)
}

/// Fake camera: a patterned buffer between JPEG markers, once per frame
async fn video_producer(sink: CaptureSink) {
    let frame_interval = Duration::from_millis(1000 / FPS);
    let mut ticker = tokio::time::interval(frame_interval);
    let mut frame_no = 0u8;

    loop {
        ticker.tick().await;

        let mut payload = Vec::with_capacity(4096);
        payload.extend_from_slice(&[0xFF, 0xD8]);
        payload.extend(std::iter::repeat(frame_no).take(4092));
        payload.extend_from_slice(&[0xFF, 0xD9]);
        frame_no = frame_no.wrapping_add(1);

        let event = CaptureEvent::video(now_secs(), WIDTH, HEIGHT, Bytes::from(payload));
        if !sink.push(event) {
            tracing::warn!("video frame dropped");
        }
    }
}

/// Fake microphone: silent fixed-size s16le blocks at the sample-rate cadence
async fn audio_producer(sink: CaptureSink) {
    let block_interval =
        Duration::from_micros(PCM_BLOCK_SAMPLES as u64 * 1_000_000 / PCM_SAMPLE_RATE);
    let mut ticker = tokio::time::interval(block_interval);
    let silence = Bytes::from(vec![0u8; PCM_BLOCK_SAMPLES * 2]);

    loop {
        ticker.tick().await;

        let event = CaptureEvent::audio(now_secs(), silence.clone());
        if !sink.push(event) {
            tracing::warn!("audio block dropped");
        }
    }
}

async fn accept_loop(
    listener: TcpListener,
    registry: Arc<ClientRegistry>,
    transport: Arc<TcpFanout>,
    queue_capacity: usize,
) {
    loop {
        let (socket, peer_addr) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::error!(error = %e, "failed to accept connection");
                continue;
            }
        };

        let (mut reader, writer) = socket.into_split();
        let (client, _sender) = registry.connect(&transport, queue_capacity).await;
        transport.attach(client, writer).await;
        tracing::info!(client = %client, peer = %peer_addr, "viewer connected");

        // Idle receive loop: peers send nothing, EOF means disconnect
        let registry = Arc::clone(&registry);
        let transport = Arc::clone(&transport);
        tokio::spawn(async move {
            let mut scratch = [0u8; 256];
            loop {
                match reader.read(&mut scratch).await {
                    Ok(0) | Err(_) => break,
                    Ok(_) => {}
                }
            }

            registry.disconnect(client).await;
            transport.detach(client).await;
            tracing::info!(client = %client, "viewer disconnected");
        });
    }
}

fn parse_bind_addr(arg: &str) -> Result<SocketAddr, String> {
    arg.replace("localhost", "127.0.0.1")
        .parse()
        .map_err(|_| format!("invalid bind address: '{}'. Expected format: IP:PORT", arg))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let bind_addr = match std::env::args().nth(1) {
        Some(arg) => parse_bind_addr(&arg).unwrap_or_else(|e| {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }),
        None => "0.0.0.0:8090".parse()?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("camcast_rs=debug".parse()?)
                .add_directive("synthetic_stream=info".parse()?),
        )
        .init();

    let config = PipelineConfig::default().stats_interval(Duration::from_secs(10));
    let queue_capacity = config.client_queue_capacity;

    let registry = Arc::new(ClientRegistry::new());
    let transport = Arc::new(TcpFanout::new());

    let (broadcaster, video_sink, audio_sink) =
        Broadcaster::with_sources(config, Arc::clone(&registry));

    tokio::spawn(video_producer(video_sink));
    tokio::spawn(audio_producer(audio_sink));

    let listener = TcpListener::bind(bind_addr).await?;
    println!("Streaming on {} ({}x{} @ {} fps + PCM audio)", bind_addr, WIDTH, HEIGHT, FPS);

    tokio::spawn(accept_loop(
        listener,
        Arc::clone(&registry),
        transport,
        queue_capacity,
    ));

    tokio::select! {
        _ = broadcaster.run() => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutting down...");
        }
    }

    Ok(())
}
