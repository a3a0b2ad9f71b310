//! Keychain search list.

use crate::commands::CommandSet;
use crate::executor::{stdout_if_success, Executor};
use crate::parsers;
use tracing::info;

/// List the keychain files in the user's search list.
pub async fn list_keychains(executor: &dyn Executor, commands: &dyn CommandSet) -> Vec<String> {
    let keychains = stdout_if_success(executor, commands.list_keychains_cmd())
        .await
        .map(|output| parsers::parse_keychain_list(&output))
        .unwrap_or_default();
    info!("Found {} keychain(s)", keychains.len());
    keychains
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MacCommands;
    use crate::test_support::ScriptedExecutor;

    #[tokio::test]
    async fn test_list_keychains() {
        let executor = ScriptedExecutor::new().with_success(
            "security list-keychains",
            "    \"/Users/me/Library/Keychains/login.keychain-db\"\n    \"/Library/Keychains/System.keychain\"\n",
        );
        let keychains = list_keychains(&executor, &MacCommands::new()).await;
        assert_eq!(
            keychains,
            vec![
                "/Users/me/Library/Keychains/login.keychain-db",
                "/Library/Keychains/System.keychain"
            ]
        );
    }

    #[tokio::test]
    async fn test_command_failure_is_empty() {
        let keychains = list_keychains(&ScriptedExecutor::new(), &MacCommands::new()).await;
        assert!(keychains.is_empty());
    }
}
