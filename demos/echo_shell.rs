//
// Copyright 2017-2026 Hans W. Uhlig. All Rights Reserved.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//      http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//

//! Small interactive shell served over telnet.
//!
//! ```text
//! cargo run -p telshell-service --example echo_shell -- 127.0.0.1:2323
//! telnet 127.0.0.1 2323
//! ```

use telshell_service::{LineHandler, ServerConfig, SessionContext, TelnetServer};
use tracing_subscriber::EnvFilter;

const COMMANDS: &[&str] = &["echo", "exit", "help", "history", "size"];

/// Shell with a shared command history and command name completion
#[derive(Default)]
struct EchoShell {
    history: Vec<Vec<u8>>,
    recall: usize,
}

impl LineHandler for EchoShell {
    fn on_line(&mut self, ctx: &mut SessionContext<'_>, line: &[u8]) {
        let line = String::from_utf8_lossy(line).trim().to_string();
        if !line.is_empty() {
            self.history.push(line.as_bytes().to_vec());
        }
        self.recall = self.history.len();

        let (command, rest) = line.split_once(' ').unwrap_or((line.as_str(), ""));
        let reply = match command {
            "" => return,
            "echo" => format!("{}\r\n", rest),
            "help" => format!("Commands: {}\r\n", COMMANDS.join(", ")),
            "history" => self
                .history
                .iter()
                .enumerate()
                .map(|(index, entry)| format!("{:4}  {}\r\n", index + 1, String::from_utf8_lossy(entry)))
                .collect(),
            "size" => format!("{}\r\n", ctx.window_size()),
            "exit" => {
                let _ = ctx.close();
                return;
            }
            other => format!("{}: command not found\r\n", other),
        };
        let _ = ctx.send(reply);
    }

    fn on_tab(&mut self, ctx: &mut SessionContext<'_>) {
        let typed = ctx.line().to_vec();
        let matches: Vec<&str> = COMMANDS
            .iter()
            .copied()
            .filter(|command| command.as_bytes().starts_with(&typed))
            .collect();
        if let [only] = matches.as_slice() {
            ctx.replace_line(only.as_bytes());
        }
    }

    fn on_history_up(&mut self, ctx: &mut SessionContext<'_>) {
        if self.recall > 0 {
            self.recall -= 1;
            ctx.replace_line(&self.history[self.recall]);
        }
    }

    fn on_history_down(&mut self, ctx: &mut SessionContext<'_>) {
        if self.recall < self.history.len() {
            self.recall += 1;
        }
        match self.history.get(self.recall) {
            Some(entry) => ctx.replace_line(entry),
            None => ctx.replace_line(b""),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let bind = std::env::args().nth(1).unwrap_or_else(|| "127.0.0.1:2323".to_string());
    let config = ServerConfig::from_bind_str(&bind)?;
    let server = TelnetServer::bind(config).await?;
    server.start(EchoShell::default()).await?;
    tracing::info!("Listening on {}, press Ctrl-C to stop", server.local_addr());

    tokio::signal::ctrl_c().await?;
    server.shutdown().await?;
    Ok(())
}
