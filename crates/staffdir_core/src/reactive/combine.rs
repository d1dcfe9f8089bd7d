//! Combine-latest dataflow node.

/// Holds the last value of three inputs and recomputes an output whenever any
/// input changes, once every input has produced at least one value.
pub struct CombineLatest3<A, B, C, O> {
    a: Option<A>,
    b: Option<B>,
    c: Option<C>,
    combine: Box<dyn Fn(&A, &B, &C) -> O>,
    output: Option<O>,
    recomputations: u64,
}

impl<A, B, C, O> CombineLatest3<A, B, C, O> {
    pub fn new(combine: impl Fn(&A, &B, &C) -> O + 'static) -> Self {
        Self {
            a: None,
            b: None,
            c: None,
            combine: Box::new(combine),
            output: None,
            recomputations: 0,
        }
    }

    /// Updates the first input; returns the new output when recomputed.
    pub fn set_a(&mut self, value: A) -> Option<&O> {
        self.a = Some(value);
        self.recompute()
    }

    pub fn set_b(&mut self, value: B) -> Option<&O> {
        self.b = Some(value);
        self.recompute()
    }

    pub fn set_c(&mut self, value: C) -> Option<&O> {
        self.c = Some(value);
        self.recompute()
    }

    pub fn a(&self) -> Option<&A> {
        self.a.as_ref()
    }

    pub fn b(&self) -> Option<&B> {
        self.b.as_ref()
    }

    pub fn c(&self) -> Option<&C> {
        self.c.as_ref()
    }

    /// Last computed output; `None` until every input has a value.
    pub fn output(&self) -> Option<&O> {
        self.output.as_ref()
    }

    pub fn recomputations(&self) -> u64 {
        self.recomputations
    }

    fn recompute(&mut self) -> Option<&O> {
        let (Some(a), Some(b), Some(c)) = (&self.a, &self.b, &self.c) else {
            return None;
        };
        self.output = Some((self.combine)(a, b, c));
        self.recomputations += 1;
        self.output.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::CombineLatest3;

    #[test]
    fn waits_for_all_inputs_then_uses_latest_values() {
        let mut node = CombineLatest3::new(|a: &i32, b: &i32, c: &i32| a + b + c);

        assert_eq!(node.set_a(1), None);
        assert_eq!(node.set_b(10), None);
        assert_eq!(node.set_c(100).copied(), Some(111));
        assert_eq!(node.set_a(2).copied(), Some(112));
        assert_eq!(node.recomputations(), 2);
    }
}
