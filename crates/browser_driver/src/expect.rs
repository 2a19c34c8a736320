//! Auto-waiting assertions over [`ElementHandle`] snapshots.
//!
//! Each assertion re-resolves its locator until the condition holds or the
//! [`WaitPolicy`] timeout elapses. A timeout is a hard failure carrying the
//! last observed state.

use core::time::Duration;

use anyhow::{Result, bail};
use log::debug;
use tokio::time::{Instant, sleep};

use crate::{BrowserDriver, ElementHandle, Locator};

/// How long assertions wait for the page to catch up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct WaitPolicy {
    pub timeout: Duration,
    pub poll_interval: Duration,
}

impl WaitPolicy {
    /// Check once and fail immediately on mismatch.
    pub const fn immediate() -> Self {
        Self {
            timeout: Duration::ZERO,
            poll_interval: Duration::from_millis(1),
        }
    }
}

impl Default for WaitPolicy {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(5),
            poll_interval: Duration::from_millis(100),
        }
    }
}

/// Pending assertion on a locator.
pub struct Expect<'driver, D> {
    driver: &'driver mut D,
    locator: Locator,
    policy: WaitPolicy,
}

/// Start an assertion on `locator`.
pub fn expect<D: BrowserDriver>(driver: &mut D, locator: Locator, policy: WaitPolicy) -> Expect<'_, D> {
    Expect {
        driver,
        locator,
        policy,
    }
}

fn texts(elements: &[ElementHandle]) -> Vec<&str> {
    elements.iter().map(|element| element.text.as_str()).collect()
}

impl<D: BrowserDriver> Expect<'_, D> {
    async fn poll<F>(mut self, describe: &str, check: F) -> Result<Vec<ElementHandle>>
    where
        F: Fn(&[ElementHandle]) -> Result<(), String>,
    {
        let start = Instant::now();
        let mut attempts = 0_u32;
        loop {
            attempts += 1;
            let last = match self.driver.locate(&self.locator).await {
                Ok(elements) => match check(&elements) {
                    Ok(()) => return Ok(elements),
                    Err(mismatch) => mismatch,
                },
                Err(err) => format!("lookup failed: {err:#}"),
            };
            if start.elapsed() >= self.policy.timeout {
                bail!(
                    "expected {} {describe}, gave up after {attempts} attempts in {:?}: {last}",
                    self.locator,
                    start.elapsed()
                );
            }
            debug!("[EXPECT] {} {describe}: {last}; retrying", self.locator);
            sleep(self.policy.poll_interval).await;
        }
    }

    /// Exactly one element, with this text.
    pub async fn to_have_text(self, expected: &str) -> Result<()> {
        self.poll(&format!("to have text {expected:?}"), |elements| match elements {
            [only] if only.text == expected => Ok(()),
            [only] => Err(format!("text was {:?}", only.text)),
            other => Err(format!("{} elements matched: {:?}", other.len(), texts(other))),
        })
        .await?;
        Ok(())
    }

    /// Element texts equal `expected`, in order.
    pub async fn to_have_texts(self, expected: &[&str]) -> Result<()> {
        self.poll(&format!("to have texts {expected:?}"), |elements| {
            let actual = texts(elements);
            if actual == expected {
                Ok(())
            } else {
                Err(format!("texts were {actual:?}"))
            }
        })
        .await?;
        Ok(())
    }

    pub async fn to_have_count(self, expected: usize) -> Result<()> {
        self.poll(&format!("to have count {expected}"), |elements| {
            if elements.len() == expected {
                Ok(())
            } else {
                Err(format!("count was {}", elements.len()))
            }
        })
        .await?;
        Ok(())
    }

    pub async fn to_be_enabled(self) -> Result<()> {
        self.poll("to be enabled", |elements| match elements {
            [] => Err("no element matched".to_owned()),
            matched if matched.iter().all(|element| element.enabled) => Ok(()),
            _ => Err("element is disabled".to_owned()),
        })
        .await?;
        Ok(())
    }

    pub async fn to_be_visible(self) -> Result<()> {
        self.poll("to be visible", |elements| match elements {
            [] => Err("no element matched".to_owned()),
            matched if matched.iter().all(|element| element.visible) => Ok(()),
            _ => Err("element is hidden".to_owned()),
        })
        .await?;
        Ok(())
    }

    /// Nothing matched, or nothing matched is rendered.
    pub async fn to_be_hidden(self) -> Result<()> {
        self.poll("to be hidden", |elements| {
            if elements.iter().any(|element| element.visible) {
                Err(format!("visible: {:?}", texts(elements)))
            } else {
                Ok(())
            }
        })
        .await?;
        Ok(())
    }

    /// Exactly one element, whose `class` attribute equals `expected`.
    pub async fn to_have_class(self, expected: &str) -> Result<()> {
        self.poll(&format!("to have class {expected:?}"), |elements| match elements {
            [only] if only.class == expected => Ok(()),
            [only] => Err(format!("class was {:?}", only.class)),
            other => Err(format!("{} elements matched", other.len())),
        })
        .await?;
        Ok(())
    }

    pub async fn to_have_value(self, expected: &str) -> Result<()> {
        self.poll(&format!("to have value {expected:?}"), |elements| match elements {
            [only] if only.value == expected => Ok(()),
            [only] => Err(format!("value was {:?}", only.value)),
            other => Err(format!("{} elements matched", other.len())),
        })
        .await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use url::Url;

    /// Page whose single element gets its final text after a few lookups.
    struct SlowPage {
        lookups: usize,
        settle_after: usize,
    }

    impl BrowserDriver for SlowPage {
        async fn navigate(&mut self, _url: &Url) -> Result<()> {
            Ok(())
        }

        async fn click(&mut self, _locator: &Locator) -> Result<()> {
            Ok(())
        }

        async fn fill(&mut self, _locator: &Locator, _text: &str) -> Result<()> {
            Ok(())
        }

        async fn locate(&mut self, _locator: &Locator) -> Result<Vec<ElementHandle>> {
            self.lookups += 1;
            let text = if self.lookups > self.settle_after { "done" } else { "pending" };
            Ok(vec![ElementHandle {
                text: text.to_owned(),
                enabled: true,
                visible: true,
                ..ElementHandle::default()
            }])
        }
    }

    fn quick() -> WaitPolicy {
        WaitPolicy {
            timeout: Duration::from_millis(200),
            poll_interval: Duration::from_millis(1),
        }
    }

    #[tokio::test]
    async fn retries_until_text_settles() -> Result<()> {
        let mut page = SlowPage { lookups: 0, settle_after: 3 };
        expect(&mut page, Locator::css("#out"), quick()).to_have_text("done").await?;
        assert_eq!(page.lookups, 4);
        Ok(())
    }

    #[tokio::test]
    async fn immediate_policy_checks_once() {
        let mut page = SlowPage { lookups: 0, settle_after: 3 };
        let outcome = expect(&mut page, Locator::css("#out"), WaitPolicy::immediate())
            .to_have_text("done")
            .await;
        let err = outcome.err().map(|err| err.to_string()).unwrap_or_default();
        assert!(err.contains("text was \"pending\""), "{err}");
        assert_eq!(page.lookups, 1);
    }

    #[tokio::test]
    async fn timeout_reports_locator_and_last_state() {
        let mut page = SlowPage { lookups: 0, settle_after: usize::MAX };
        let outcome = expect(&mut page, Locator::css("#out"), quick()).to_have_count(2).await;
        let err = outcome.err().map(|err| err.to_string()).unwrap_or_default();
        assert!(err.contains("css=#out"), "{err}");
        assert!(err.contains("count was 1"), "{err}");
    }

    #[tokio::test]
    async fn value_is_compared_exactly() -> Result<()> {
        struct Input;
        impl BrowserDriver for Input {
            async fn navigate(&mut self, _url: &Url) -> Result<()> {
                Ok(())
            }
            async fn click(&mut self, _locator: &Locator) -> Result<()> {
                Ok(())
            }
            async fn fill(&mut self, _locator: &Locator, _text: &str) -> Result<()> {
                Ok(())
            }
            async fn locate(&mut self, _locator: &Locator) -> Result<Vec<ElementHandle>> {
                Ok(vec![ElementHandle {
                    value: "walk".to_owned(),
                    enabled: true,
                    visible: true,
                    ..ElementHandle::default()
                }])
            }
        }

        let mut input = Input;
        expect(&mut input, Locator::css("#input-add"), quick())
            .to_have_value("walk")
            .await?;
        let outcome = expect(&mut input, Locator::css("#input-add"), WaitPolicy::immediate())
            .to_have_value("")
            .await;
        let err = outcome.err().map(|err| err.to_string()).unwrap_or_default();
        assert!(err.contains("value was \"walk\""), "{err}");
        Ok(())
    }
}
