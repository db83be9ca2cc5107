//! Document context handling
//!
//! The session's current frame is shared mutable state. Code outside this
//! module may assume the session sits in the top document; anything that
//! enters a frame puts it back before returning, on success and on failure.

use serde::{Deserialize, Serialize};
use std::future::Future;
use tracing::warn;

use crate::driver::Driver;
use crate::error::E2eResult;

/// Frame indices from the top document down; empty means the top document
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FramePath(Vec<u16>);

impl FramePath {
    pub fn top() -> Self {
        Self(Vec::new())
    }

    pub fn is_top(&self) -> bool {
        self.0.is_empty()
    }

    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn indices(&self) -> &[u16] {
        &self.0
    }

    /// Path one level below this one
    pub fn child(&self, index: u16) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl From<Vec<u16>> for FramePath {
    fn from(indices: Vec<u16>) -> Self {
        Self(indices)
    }
}

impl std::fmt::Display for FramePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.0.is_empty() {
            return write!(f, "top");
        }
        let parts: Vec<String> = self.0.iter().map(|i| format!("frame[{}]", i)).collect();
        write!(f, "{}", parts.join(" > "))
    }
}

/// Walk from the top document down `path`
pub async fn enter(driver: &dyn Driver, path: &FramePath) -> E2eResult<()> {
    driver.enter_default_content().await?;
    for index in path.indices() {
        driver.enter_frame(*index).await?;
    }
    Ok(())
}

/// Return to the top document, logging instead of failing
pub async fn reset(driver: &dyn Driver) {
    if let Err(e) = driver.enter_default_content().await {
        warn!("Failed to restore default document context: {}", e);
    }
}

/// Run `body` inside `path` and restore the top document afterwards.
///
/// `body` is a lazy future, so nothing in it runs until the frame has been
/// entered. For the top document this is a plain await.
pub async fn scoped<T, Fut>(driver: &dyn Driver, path: &FramePath, body: Fut) -> E2eResult<T>
where
    Fut: Future<Output = E2eResult<T>>,
{
    if path.is_top() {
        return body.await;
    }

    let outcome = match enter(driver, path).await {
        Ok(()) => body.await,
        Err(e) => Err(e),
    };
    reset(driver).await;
    outcome
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_path_display() {
        assert_eq!(FramePath::top().to_string(), "top");
        assert_eq!(FramePath::top().child(1).child(0).to_string(), "frame[1] > frame[0]");
    }

    #[test]
    fn test_child_extends_path() {
        let path = FramePath::from(vec![2]);
        let nested = path.child(3);
        assert_eq!(nested.indices(), &[2, 3]);
        assert_eq!(nested.depth(), 2);
        assert!(!nested.is_top());
        assert!(FramePath::default().is_top());
    }
}
