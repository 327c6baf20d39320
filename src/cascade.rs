// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

use crate::style::AttributeFrame;

/// A bounded stack of attribute frames mirroring the element nesting.
///
/// Pushes past the capacity are not stored, but still counted, so that
/// the matching pops keep the stack balanced.
#[derive(Clone, Debug)]
pub(crate) struct AttributeStack {
    frames: Vec<AttributeFrame>,
    depth: usize,
    capacity: usize,
}

impl AttributeStack {
    /// Creates a stack holding only the root frame.
    ///
    /// `capacity` is the number of frames above the root.
    pub fn new(root: AttributeFrame, capacity: usize) -> Self {
        let mut frames = Vec::with_capacity(capacity.min(64) + 1);
        frames.push(root);
        AttributeStack {
            frames,
            depth: 0,
            capacity,
        }
    }

    /// Copies the current frame on top of the stack.
    ///
    /// Returns `false` when the stack is full. The push is still counted.
    pub fn push(&mut self) -> bool {
        self.depth += 1;
        if self.depth > self.capacity {
            return false;
        }

        let mut frame = self.top().clone();
        frame.reset_non_inherited();
        self.frames.push(frame);
        true
    }

    /// Removes the current frame.
    ///
    /// Popping the root frame is a no-op that returns `false`.
    pub fn pop(&mut self) -> bool {
        if self.depth == 0 {
            return false;
        }

        if self.depth <= self.capacity {
            self.frames.pop();
        }

        self.depth -= 1;
        true
    }

    #[inline]
    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn top(&self) -> &AttributeFrame {
        // The root frame is never removed.
        &self.frames[self.frames.len() - 1]
    }

    pub fn top_mut(&mut self) -> &mut AttributeFrame {
        let idx = self.frames.len() - 1;
        &mut self.frames[idx]
    }

    /// Returns the frame below the current one, or the root.
    pub fn parent(&self) -> &AttributeFrame {
        let idx = self.frames.len().saturating_sub(2);
        &self.frames[idx]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::PaintValue;

    #[test]
    fn push_copies_the_parent() {
        let mut stack = AttributeStack::new(AttributeFrame::default(), 8);
        stack.top_mut().stroke_width = 5.0;
        stack.top_mut().id = Some("root".to_string());
        assert!(stack.push());
        assert_eq!(stack.top().stroke_width, 5.0);
        assert_eq!(stack.top().id, None);

        stack.top_mut().fill = PaintValue::None;
        assert!(stack.pop());
        assert_ne!(stack.top().fill, PaintValue::None);
    }

    #[test]
    fn pop_at_root_is_a_noop() {
        let mut stack = AttributeStack::new(AttributeFrame::default(), 8);
        assert!(!stack.pop());
        assert!(!stack.pop());
        assert_eq!(stack.depth(), 0);
        assert!(stack.push());
        assert_eq!(stack.depth(), 1);
    }

    #[test]
    fn overflow_keeps_balance() {
        let mut stack = AttributeStack::new(AttributeFrame::default(), 2);
        assert!(stack.push());
        stack.top_mut().stroke_width = 2.0;
        assert!(stack.push());
        stack.top_mut().stroke_width = 3.0;
        assert!(!stack.push());
        assert!(!stack.push());
        assert_eq!(stack.depth(), 4);
        assert_eq!(stack.top().stroke_width, 3.0);

        assert!(stack.pop());
        assert!(stack.pop());
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.top().stroke_width, 3.0);

        assert!(stack.pop());
        assert_eq!(stack.top().stroke_width, 2.0);
        assert!(stack.pop());
        assert_eq!(stack.top().stroke_width, 1.0);
        assert!(!stack.pop());
    }
}
