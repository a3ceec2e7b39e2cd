//! Operator confirmation for manual login

use crate::SweeperError;
use async_trait::async_trait;

/// Blocks until a human says the login is done
#[async_trait]
pub trait OperatorPrompt: Send {
    async fn wait_for_login(&mut self, url: &str) -> Result<(), SweeperError>;
}

/// Prompts on the terminal and waits for Enter
#[derive(Debug, Default, Clone, Copy)]
pub struct StdinPrompt;

#[async_trait]
impl OperatorPrompt for StdinPrompt {
    async fn wait_for_login(&mut self, url: &str) -> Result<(), SweeperError> {
        println!();
        println!("{}", "=".repeat(60));
        println!("Login required.");
        println!("Log in at {} in the browser window,", url);
        println!("then press Enter here to save the session.");

        let line = tokio::task::spawn_blocking(|| {
            let mut input = String::new();
            std::io::stdin().read_line(&mut input).map(|_| input)
        })
        .await
        .map_err(|e| SweeperError::Prompt(e.to_string()))?;

        line.map(|_| ())
            .map_err(|e| SweeperError::Prompt(e.to_string()))
    }
}
