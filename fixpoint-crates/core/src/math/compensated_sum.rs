/// Neumaier's variant of Kahan summation.
///
/// Activities of long rows are sums of terms with very different magnitudes; a plain running sum
/// makes the computed activity depend on the order of the terms.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub(crate) fn add(&mut self, term: f64) {
        let total = self.sum + term;
        if self.sum.abs() >= term.abs() {
            self.compensation += (self.sum - total) + term;
        } else {
            self.compensation += (term - total) + self.sum;
        }
        self.sum = total;
    }

    pub(crate) fn value(&self) -> f64 {
        self.sum + self.compensation
    }
}

/// Sum of the finite terms of an activity together with the number of infinite terms.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct Activity {
    finite: CompensatedSum,
    num_infinite: usize,
}

impl Activity {
    pub(crate) fn add(&mut self, term: f64) {
        if term.is_infinite() {
            self.num_infinite += 1;
        } else {
            self.finite.add(term);
        }
    }

    pub(crate) fn num_infinite(&self) -> usize {
        self.num_infinite
    }

    /// The finite part of the activity, ignoring infinite terms.
    pub(crate) fn finite_value(&self) -> f64 {
        self.finite.value()
    }

    pub(crate) fn is_finite(&self) -> bool {
        self.num_infinite == 0
    }
}
