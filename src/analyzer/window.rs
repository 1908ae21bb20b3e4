//! Sliding window of recent inference latencies

use std::collections::VecDeque;

/// Number of recent latencies kept for the rolling average
pub const LATENCY_WINDOW_CAPACITY: usize = 100;

/// Bounded history of recent analysis durations; the oldest entry is evicted on overflow
#[derive(Debug, Clone)]
pub struct LatencyWindow {
    samples: VecDeque<f64>,
    capacity: usize,
}

impl LatencyWindow {
    pub fn new() -> Self {
        Self::with_capacity(LATENCY_WINDOW_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            samples: VecDeque::with_capacity(capacity),
            capacity: capacity.max(1),
        }
    }

    /// Record a latency in milliseconds
    pub fn record(&mut self, latency_ms: f64) {
        if self.samples.len() == self.capacity {
            self.samples.pop_front();
        }
        self.samples.push_back(latency_ms);
    }

    /// Arithmetic mean of the window, or 0.0 when empty
    pub fn average_ms(&self) -> f64 {
        if self.samples.is_empty() {
            return 0.0;
        }
        self.samples.iter().sum::<f64>() / self.samples.len() as f64
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Oldest latency still in the window
    pub fn oldest(&self) -> Option<f64> {
        self.samples.front().copied()
    }
}

impl Default for LatencyWindow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_average_is_zero() {
        let window = LatencyWindow::new();
        assert!(window.is_empty());
        assert_eq!(window.average_ms(), 0.0);
        assert_eq!(window.oldest(), None);
    }

    #[test]
    fn test_average() {
        let mut window = LatencyWindow::new();
        window.record(1.0);
        window.record(2.0);
        window.record(6.0);
        assert_eq!(window.len(), 3);
        assert!((window.average_ms() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_evicts_oldest_after_capacity() {
        let mut window = LatencyWindow::new();
        for i in 0..=LATENCY_WINDOW_CAPACITY {
            window.record(i as f64);
        }
        // 101 samples recorded, the first (0.0) is gone
        assert_eq!(window.len(), LATENCY_WINDOW_CAPACITY);
        assert_eq!(window.oldest(), Some(1.0));
    }

    #[test]
    fn test_average_reflects_only_window() {
        let mut window = LatencyWindow::with_capacity(2);
        window.record(100.0);
        window.record(2.0);
        window.record(4.0);
        assert_eq!(window.len(), 2);
        assert!((window.average_ms() - 3.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut window = LatencyWindow::with_capacity(0);
        window.record(5.0);
        window.record(7.0);
        assert_eq!(window.capacity(), 1);
        assert_eq!(window.oldest(), Some(7.0));
    }
}
