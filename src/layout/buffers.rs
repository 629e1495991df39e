/// Flat x / y position buffers, one slot per entry of the ordered body index.
///
/// Changing the index invalidates the buffers. They are reallocated to the new
/// length by the next [`ResultBuffers::prepare`], which bumps the generation.
///
/// # Examples
///
/// ```
/// use force_layout::layout::ResultBuffers;
///
/// let mut buffers = ResultBuffers::new();
/// assert!(buffers.prepare(3));
/// assert_eq!(buffers.xs().len(), 3);
/// assert!(!buffers.prepare(3));
///
/// buffers.invalidate();
/// assert!(buffers.prepare(4));
/// assert_eq!(buffers.generation(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResultBuffers {
    xs: Vec<f64>,
    ys: Vec<f64>,
    generation: u64,
    stale: bool,
}

impl ResultBuffers {
    /// Empty buffers that reallocate on first use.
    pub fn new() -> Self {
        ResultBuffers {
            stale: true,
            ..ResultBuffers::default()
        }
    }

    pub fn invalidate(&mut self) {
        self.stale = true;
    }

    pub fn is_stale(&self) -> bool {
        self.stale
    }

    /// Reallocates to `len` zeroed slots if invalidated. Returns true if it did.
    pub fn prepare(&mut self, len: usize) -> bool {
        if !self.stale && self.xs.len() == len {
            return false;
        }
        self.xs = vec![0.0; len];
        self.ys = vec![0.0; len];
        self.generation += 1;
        self.stale = false;
        true
    }

    pub fn set(&mut self, slot: usize, x: f64, y: f64) {
        self.xs[slot] = x;
        self.ys[slot] = y;
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}
