use keyscribe_types::SymbolTable;

/// Token committed when a chord with no pitches is flushed.
pub const REST_PLACEHOLDER: &str = " ";

/// Build the ABC token for a completed chord, notes in press order.
///
/// Notes without a symbol are skipped; callers only pass transcribable notes.
pub fn chord_token(notes: &[u8]) -> String {
    let symbols: Vec<&str> = notes.iter().filter_map(|&n| SymbolTable::pitch(n)).collect();
    match symbols.as_slice() {
        [] => REST_PLACEHOLDER.to_string(),
        [single] => (*single).to_string(),
        many => {
            let mut token = String::with_capacity(2 + many.iter().map(|s| s.len()).sum::<usize>());
            token.push('[');
            for s in many {
                token.push_str(s);
            }
            token.push(']');
            token
        }
    }
}

/// Accumulates concurrently held notes and emits one token per chord.
///
/// A chord is every note pressed since the held set last became empty; it is
/// committed when its last note is released.
#[derive(Debug, Clone, Default)]
pub struct ChordTranscriber {
    /// Notes currently held, in press order.
    held: Vec<u8>,
    /// Every note pressed during the current chord, in press order.
    chord: Vec<u8>,
}

impl ChordTranscriber {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a press. Notes outside the symbol table and repeated presses
    /// of a held note are ignored.
    pub fn note_on(&mut self, note: u8) {
        if !SymbolTable::is_transcribable(note) || self.held.contains(&note) {
            return;
        }
        self.held.push(note);
        if !self.chord.contains(&note) {
            self.chord.push(note);
        }
    }

    /// Register a release. Returns the chord token when this release empties
    /// the held set; releasing a note that is not held does nothing.
    pub fn note_off(&mut self, note: u8) -> Option<String> {
        let pos = self.held.iter().position(|&n| n == note)?;
        self.held.remove(pos);
        if self.held.is_empty() {
            let token = chord_token(&self.chord);
            self.chord.clear();
            Some(token)
        } else {
            None
        }
    }

    /// Commit the current chord immediately and forget every held note.
    pub fn flush(&mut self) -> String {
        let token = chord_token(&self.chord);
        self.cancel();
        token
    }

    /// Drop the current chord without committing anything.
    pub fn cancel(&mut self) {
        self.held.clear();
        self.chord.clear();
    }

    pub fn held(&self) -> &[u8] {
        &self.held
    }

    /// Notes that will make up the token if the chord completes now.
    pub fn pending_chord(&self) -> &[u8] {
        &self.chord
    }

    pub fn is_idle(&self) -> bool {
        self.held.is_empty()
    }
}
