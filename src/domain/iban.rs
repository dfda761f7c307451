use serde::Serialize;

/// Outcome of the latest settled IBAN check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IbanVerdict {
    #[default]
    Unknown,
    Valid,
    Invalid,
}

impl From<bool> for IbanVerdict {
    fn from(valid: bool) -> Self {
        if valid {
            IbanVerdict::Valid
        } else {
            IbanVerdict::Invalid
        }
    }
}

/// Progress and result of remote IBAN checks for one form session.
///
/// Each check is stamped with a sequence number. Only the most recently
/// issued check may settle the state; older ones are stale.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ValidationState {
    pub is_validating: bool,
    pub result: IbanVerdict,
    #[serde(skip)]
    latest_seq: u64,
}

impl ValidationState {
    /// Starts a new check and returns its sequence number.
    pub fn begin(&mut self) -> u64 {
        self.latest_seq += 1;
        self.is_validating = true;
        self.latest_seq
    }

    /// Applies a settled check. Returns `false` when `seq` is stale.
    pub fn settle(&mut self, seq: u64, valid: bool) -> bool {
        if seq != self.latest_seq || !self.is_validating {
            return false;
        }
        self.is_validating = false;
        self.result = valid.into();
        true
    }

    /// Invalidates any in-flight check and forgets the last result.
    ///
    /// Only used when the payee account is emptied, so no stale verdict is shown.
    pub fn reset(&mut self) {
        self.latest_seq += 1;
        self.is_validating = false;
        self.result = IbanVerdict::Unknown;
    }

    /// Sequence number of the check still awaiting settlement, if any.
    pub fn pending(&self) -> Option<u64> {
        self.is_validating.then_some(self.latest_seq)
    }
}
