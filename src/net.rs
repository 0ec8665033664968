use std::io::Write;
use std::net::TcpStream;
use std::time::{Duration, Instant};

use crate::gesture::GestureRecord;

/// ゲームエンジン側TCPサーバーへのクライアント接続
///
/// 状態は接続中/切断中の2値のみ。ソケットハンドルは常に高々1つで、
/// 切断に遷移する時点で必ず解放される。タイムアウトは設定しない。
/// 接続エラーは致命的ではなく、状態遷移とログだけで呼び出し側へは伝播しない。
pub struct GestureClient {
    addr: String,
    stream: Option<TcpStream>,
}

impl GestureClient {
    pub fn new(host: &str, port: u16) -> Self {
        Self {
            addr: format!("{}:{}", host, port),
            stream: None,
        }
    }

    pub fn is_connected(&self) -> bool {
        self.stream.is_some()
    }

    /// 同期ブロッキングで接続する。失敗しても切断状態のままループを続行できる。
    pub fn connect(&mut self) -> bool {
        match TcpStream::connect(&self.addr) {
            Ok(stream) => {
                println!("Connected to {}", self.addr);
                self.stream = Some(stream);
                true
            }
            Err(e) => {
                eprintln!("Failed to connect to {}: {}", self.addr, e);
                self.stream = None;
                false
            }
        }
    }

    /// 接続済みなら何もしない。切断中なら古いハンドルを捨てて接続し直す。
    pub fn reconnect(&mut self) -> bool {
        if self.stream.is_some() {
            return true;
        }
        self.close();
        self.connect()
    }

    /// ハンドルを無条件に解放する。切断中に呼んでも安全。
    pub fn close(&mut self) {
        // drop でソケットが閉じる
        self.stream = None;
    }

    /// レコードを1行のJSONとして送信する
    ///
    /// 切断中は何もしない。書き込み失敗は切断への遷移として記録するだけで、
    /// エラーとしては返さない。再接続はループ側のポリシーに任せる。
    pub fn send(&mut self, record: &GestureRecord) {
        let stream = match self.stream.as_mut() {
            Some(stream) => stream,
            None => return,
        };

        let mut line = match serde_json::to_string(record) {
            Ok(json) => json,
            Err(e) => {
                eprintln!("Failed to serialize record: {}", e);
                return;
            }
        };
        line.push('\n');

        if let Err(e) = stream.write_all(line.as_bytes()) {
            eprintln!("Connection lost: {}", e);
            self.stream = None;
        }
    }
}

/// 切断中の再接続間隔を制御するポリシー
///
/// フレームごとに呼ばれても、実際の接続試行は interval に1回までに抑える。
pub struct ReconnectPolicy {
    interval: Duration,
    last_attempt: Option<Instant>,
}

impl ReconnectPolicy {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_attempt: None,
        }
    }

    pub fn from_secs(secs: f32) -> Self {
        Self::new(Duration::from_secs_f32(secs))
    }

    /// いま接続を試みてよいか。trueを返した場合は試行として記録する。
    pub fn should_attempt(&mut self) -> bool {
        self.should_attempt_at(Instant::now())
    }

    /// 次のshould_attemptで即座に試行できるようにする（手動再接続用）
    pub fn force(&mut self) {
        self.last_attempt = None;
    }

    fn should_attempt_at(&mut self, now: Instant) -> bool {
        match self.last_attempt {
            Some(last) if now.duration_since(last) < self.interval => false,
            _ => {
                self.last_attempt = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    fn sample_record() -> GestureRecord {
        GestureRecord {
            x: Some(0.5),
            y: Some(0.25),
            z: Some(-0.01),
            visible: true,
            closed_fist: false,
            reserved: false,
            fast_movement: false,
        }
    }

    #[test]
    fn test_new_client_is_disconnected() {
        let client = GestureClient::new("127.0.0.1", 12345);
        assert!(!client.is_connected());
    }

    #[test]
    fn test_send_while_disconnected_is_noop() {
        let mut client = GestureClient::new("127.0.0.1", 12345);
        client.send(&sample_record());
        assert!(!client.is_connected());
    }

    #[test]
    fn test_close_while_disconnected_is_safe() {
        let mut client = GestureClient::new("127.0.0.1", 12345);
        client.close();
        client.close();
        assert!(!client.is_connected());
    }

    #[test]
    fn test_connect_refused_leaves_disconnected() {
        // 一度bindして即閉じたポートには誰もいない
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let mut client = GestureClient::new("127.0.0.1", port);
        assert!(!client.connect());
        assert!(!client.is_connected());
    }

    #[test]
    fn test_send_delivers_one_json_line() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let handle = thread::spawn(move || {
            let (socket, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(socket);
            let mut line = String::new();
            reader.read_line(&mut line).unwrap();
            line
        });

        let mut client = GestureClient::new("127.0.0.1", port);
        assert!(client.connect());
        client.send(&sample_record());
        client.close();

        let line = handle.join().unwrap();
        assert!(line.ends_with('\n'));
        let value: serde_json::Value = serde_json::from_str(line.trim()).unwrap();
        assert_eq!(value["h"], serde_json::json!(true));
        assert_eq!(value["x"], serde_json::json!(0.5));
        assert_eq!(value["f"], serde_json::json!(false));
        assert!(value.get("fast").is_none());
    }

    #[test]
    fn test_reconnect_is_idempotent_while_connected() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut client = GestureClient::new("127.0.0.1", port);
        assert!(client.connect());
        assert!(client.reconnect());
        assert!(client.is_connected());
    }

    #[test]
    fn test_send_failure_transitions_to_disconnected() {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();

        let mut client = GestureClient::new("127.0.0.1", port);
        assert!(client.connect());

        // 相手側ソケットを閉じて書き込みを失敗させる
        let (socket, _) = listener.accept().unwrap();
        drop(socket);
        drop(listener);

        // 最初の書き込みはバッファに乗ることがあるので、失敗するまで送り続ける
        for _ in 0..50 {
            if !client.is_connected() {
                break;
            }
            client.send(&sample_record());
            thread::sleep(Duration::from_millis(10));
        }
        assert!(!client.is_connected());

        // 切断後のsendは no-op のまま
        client.send(&sample_record());
        assert!(!client.is_connected());
    }

    #[test]
    fn test_policy_first_attempt_is_immediate() {
        let mut policy = ReconnectPolicy::from_secs(3.0);
        assert!(policy.should_attempt());
    }

    #[test]
    fn test_policy_throttles_within_interval() {
        let mut policy = ReconnectPolicy::new(Duration::from_secs(3));
        let t0 = Instant::now();
        assert!(policy.should_attempt_at(t0));
        // 連続するフレームでは再試行しない
        assert!(!policy.should_attempt_at(t0 + Duration::from_millis(16)));
        assert!(!policy.should_attempt_at(t0 + Duration::from_millis(2900)));
    }

    #[test]
    fn test_policy_allows_attempt_after_interval() {
        let mut policy = ReconnectPolicy::new(Duration::from_secs(3));
        let t0 = Instant::now();
        assert!(policy.should_attempt_at(t0));
        assert!(policy.should_attempt_at(t0 + Duration::from_secs(3)));
    }

    #[test]
    fn test_policy_force_bypasses_interval() {
        let mut policy = ReconnectPolicy::new(Duration::from_secs(3));
        let t0 = Instant::now();
        assert!(policy.should_attempt_at(t0));
        policy.force();
        assert!(policy.should_attempt_at(t0 + Duration::from_millis(1)));
    }
}
