use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader, DuplexStream};
use tokio::sync::mpsc;
use tokio::time::timeout;

use turret_shared::protocol::{codes, INVALID_PASSWORD, LOGIN_SUCCESSFUL};
use turret_shared::{CommandEncoder, CommandTable};

use turret_server::serial::CommandSink;
use turret_server::session::{run_session, SessionContext};
use turret_server::shutdown::ShutdownSignal;

const PASSWORD: &str = "hunter2";

fn context(bypass: bool) -> (SessionContext, mpsc::Receiver<u8>) {
    let (sink, rx) = CommandSink::channel(8);
    let ctx = SessionContext {
        encoder: Arc::new(CommandEncoder::new(CommandTable::standard())),
        sink,
        password: PASSWORD.to_string(),
        validation_bypass: bypass,
        shutdown: ShutdownSignal::new(),
    };
    (ctx, rx)
}

/// Spawns a session over an in-memory stream, returning the client side.
fn spawn_session(ctx: SessionContext) -> (DuplexStream, tokio::task::JoinHandle<()>) {
    let (client, server_side) = tokio::io::duplex(1024);
    let handle = tokio::spawn(run_session(server_side, "test-client", ctx));
    (client, handle)
}

async fn recv_byte(rx: &mut mpsc::Receiver<u8>) -> u8 {
    timeout(Duration::from_secs(1), rx.recv())
        .await
        .expect("timed out waiting for a serial byte")
        .expect("serial sink closed")
}

#[tokio::test]
async fn test_login_then_commands_reach_the_serial_sink() {
    let (ctx, mut rx) = context(false);
    let (client, _handle) = spawn_session(ctx);
    let (read_half, mut write_half) = tokio::io::split(client);
    let mut replies = BufReader::new(read_half).lines();

    write_half.write_all(b"hunter2\n").await.unwrap();
    let reply = replies.next_line().await.unwrap().unwrap();
    assert_eq!(reply, LOGIN_SUCCESSFUL);

    write_half.write_all(b"FIRE\n").await.unwrap();
    assert_eq!(recv_byte(&mut rx).await, codes::FIRE);

    write_half.write_all(b"ROTATE SPEED -7\n").await.unwrap();
    assert_eq!(recv_byte(&mut rx).await, 0x29);

    // Fire-and-forget: no reply was queued for either command.
    write_half.shutdown().await.unwrap();
    assert_eq!(replies.next_line().await.unwrap(), None);
}

#[tokio::test]
async fn test_wrong_password_terminates_the_connection() {
    let (ctx, mut rx) = context(false);
    let (client, handle) = spawn_session(ctx);
    let (read_half, mut write_half) = tokio::io::split(client);
    let mut replies = BufReader::new(read_half).lines();

    // The second line is a perfectly valid command phrase; it must never
    // execute because the connection is already dead.
    write_half.write_all(b"letmein\nFIRE\n").await.unwrap();

    let reply = replies.next_line().await.unwrap().unwrap();
    assert_eq!(reply, INVALID_PASSWORD);
    assert_eq!(replies.next_line().await.unwrap(), None);

    timeout(Duration::from_secs(1), handle)
        .await
        .expect("session should have ended")
        .unwrap();
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_validation_bypass_accepts_commands_immediately() {
    let (ctx, mut rx) = context(true);
    let (client, _handle) = spawn_session(ctx);
    let (_read_half, mut write_half) = tokio::io::split(client);

    write_half.write_all(b"SAFETY ON\n").await.unwrap();
    assert_eq!(recv_byte(&mut rx).await, codes::SAFETY_ON);
}

#[tokio::test]
async fn test_unrecognized_command_is_nonfatal() {
    let (ctx, mut rx) = context(true);
    let (client, _handle) = spawn_session(ctx);
    let (_read_half, mut write_half) = tokio::io::split(client);

    write_half.write_all(b"DANCE\n").await.unwrap();
    write_half.write_all(b"ROTATE SPEED 999\n").await.unwrap();
    write_half.write_all(b"CEASE FIRE\n").await.unwrap();

    // Only the valid command produced a byte.
    assert_eq!(recv_byte(&mut rx).await, codes::STOP_FIRE);
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_shutdown_sentinel_triggers_shutdown_not_a_write() {
    let (ctx, mut rx) = context(true);
    let shutdown = ctx.shutdown.clone();
    let (client, handle) = spawn_session(ctx);
    let (_read_half, mut write_half) = tokio::io::split(client);

    write_half.write_all(b"STOP SERVER\n").await.unwrap();

    timeout(Duration::from_secs(1), shutdown.triggered())
        .await
        .expect("shutdown should have been triggered");
    timeout(Duration::from_secs(1), handle)
        .await
        .expect("session should have ended")
        .unwrap();
    assert!(rx.try_recv().is_err());
}

#[tokio::test]
async fn test_crlf_framed_credentials_are_accepted() {
    let (ctx, _rx) = context(false);
    let (client, _handle) = spawn_session(ctx);
    let (read_half, mut write_half) = tokio::io::split(client);
    let mut replies = BufReader::new(read_half).lines();

    write_half.write_all(b"hunter2\r\n").await.unwrap();
    let reply = replies.next_line().await.unwrap().unwrap();
    assert_eq!(reply, LOGIN_SUCCESSFUL);
}

#[tokio::test]
async fn test_process_shutdown_ends_idle_sessions() {
    let (ctx, _rx) = context(true);
    let shutdown = ctx.shutdown.clone();
    let (client, handle) = spawn_session(ctx);

    shutdown.trigger();
    timeout(Duration::from_secs(1), handle)
        .await
        .expect("session should have observed shutdown")
        .unwrap();

    // The server side hung up; reads on the client now see EOF.
    let mut client = client;
    let mut buf = Vec::new();
    let n = client.read_to_end(&mut buf).await.unwrap();
    assert_eq!(n, 0);
}
