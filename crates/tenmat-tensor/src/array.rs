use std::marker::PhantomData;

use num_traits::{One, Zero};

use crate::{
    allocator::{CpuAllocator, TensorAllocator},
    data::{Data, DataMut},
    error::TensorError,
    layout::{self, OffsetIter},
    policy::{resolve_offset, IndexPolicy, Periodic, Regular},
    storage::TensorStorage,
};

/// An n-dimensional strided array generic over its buffer and addressing policy.
///
/// `S` holds the elements: an owned [`TensorStorage`] for [`Array`], or a
/// borrowed slice for [`ArrayView`](crate::ArrayView) and
/// [`ArrayViewMut`](crate::ArrayViewMut). `P` decides how an
/// incoming multi-index is mapped before the flat offset is computed, see
/// [`IndexPolicy`]. Storage layout and iteration order never depend on `P`.
///
/// Owned arrays are always stored contiguously in row-major order. Views may
/// carry arbitrary strides over a foreign buffer.
///
/// # Type Parameters
///
/// * `S` - The backing buffer, implementing [`Data`].
/// * `P` - The addressing policy, [`Regular`] by default.
pub struct ArrayBase<S, P: IndexPolicy = Regular> {
    pub(crate) data: S,
    pub(crate) shape: Vec<usize>,
    pub(crate) strides: Vec<usize>,
    pub(crate) policy: PhantomData<P>,
}

/// An owned, allocator-backed n-dimensional array.
pub type Array<T, P = Regular, A = CpuAllocator> = ArrayBase<TensorStorage<T, A>, P>;

/// An owned array addressed with periodic wrapping.
pub type PeriodicArray<T, A = CpuAllocator> = Array<T, Periodic, A>;

impl<S, P: IndexPolicy> ArrayBase<S, P> {
    /// Assembles an array from already validated parts.
    #[inline]
    pub(crate) fn from_parts(data: S, shape: Vec<usize>, strides: Vec<usize>) -> Self {
        Self {
            data,
            shape,
            strides,
            policy: PhantomData,
        }
    }

    /// Returns the shape of the array.
    #[inline]
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the strides of the array in element units.
    #[inline]
    pub fn strides(&self) -> &[usize] {
        &self.strides
    }

    /// Returns the rank, i.e. the number of axes.
    #[inline]
    pub fn ndim(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of logical elements.
    #[inline]
    pub fn numel(&self) -> usize {
        layout::numel(&self.shape)
    }

    /// Returns true if the array is laid out contiguously in row-major order.
    #[inline]
    pub fn is_standard_layout(&self) -> bool {
        layout::is_standard_layout(&self.shape, &self.strides)
    }

    /// True if the array wraps its indices periodically.
    #[inline]
    pub fn is_periodic(&self) -> bool {
        P::PERIODIC
    }

    /// Reinterprets the array under another addressing policy without copying.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<f64>::from_shape_vec(&[4], vec![1.0, 2.0, 3.0, 4.0], CpuAllocator).unwrap();
    /// let p = a.into_periodic();
    /// assert_eq!(p.get(&[-1]).unwrap(), &4.0);
    /// ```
    pub fn into_policy<Q: IndexPolicy>(self) -> ArrayBase<S, Q> {
        ArrayBase::from_parts(self.data, self.shape, self.strides)
    }

    /// Reinterprets the array with periodic addressing.
    pub fn into_periodic(self) -> ArrayBase<S, Periodic> {
        self.into_policy()
    }

    /// Reinterprets the array with regular, range-checked addressing.
    pub fn into_regular(self) -> ArrayBase<S, Regular> {
        self.into_policy()
    }
}

impl<S: Data, P: IndexPolicy> ArrayBase<S, P> {
    /// Returns the whole backing buffer.
    ///
    /// For owned arrays and contiguous views this is the data in row-major
    /// order. For strided views it is the wrapped buffer, including elements
    /// the view does not address.
    #[inline]
    pub fn as_slice(&self) -> &[S::Elem] {
        self.data.as_slice()
    }

    /// Returns the pointer to the first element of the backing buffer.
    #[inline]
    pub fn as_ptr(&self) -> *const S::Elem {
        self.data.as_slice().as_ptr()
    }

    /// Returns the buffer offset addressed by `index` under the array's policy.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the index rank differs from
    /// the array rank, and for regular arrays [`TensorError::IndexOutOfRange`]
    /// if a component is not smaller than its dimension.
    #[inline]
    pub fn offset(&self, index: &[P::Index]) -> Result<usize, TensorError> {
        resolve_offset::<P>(index, &self.shape, &self.strides)
    }

    /// Returns a reference to the element at `index`.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<i32>::from_shape_vec(&[2, 2], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// assert_eq!(a.get(&[1, 0]).unwrap(), &3);
    /// assert!(a.get(&[2, 0]).is_err());
    /// ```
    pub fn get(&self, index: &[P::Index]) -> Result<&S::Elem, TensorError> {
        let offset = self.offset(index)?;
        Ok(&self.data.as_slice()[offset])
    }

    /// Returns the buffer offset of the `flat`-th element in row-major logical order.
    pub fn flat_offset(&self, flat: usize) -> Result<usize, TensorError> {
        if self.is_standard_layout() {
            let size = self.numel();
            if flat >= size {
                return Err(TensorError::index_out_of_range(0, flat, size));
            }
            return Ok(flat);
        }
        let index = layout::unravel_index(flat, &self.shape)?;
        Ok(index.iter().zip(&self.strides).map(|(&i, &s)| i * s).sum())
    }

    /// Returns a reference to the `flat`-th element in row-major logical order.
    pub fn get_flat(&self, flat: usize) -> Result<&S::Elem, TensorError> {
        let offset = self.flat_offset(flat)?;
        Ok(&self.data.as_slice()[offset])
    }

    /// Converts a flat logical position into the canonical multi-index.
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<f64>::zeros(&[2, 3], CpuAllocator).unwrap();
    /// assert_eq!(a.index_of(4).unwrap(), vec![1, 1]);
    /// ```
    pub fn index_of(&self, flat: usize) -> Result<Vec<usize>, TensorError> {
        layout::unravel_index(flat, &self.shape)
    }

    /// Returns an iterator over the elements in row-major logical order.
    pub fn iter(&self) -> impl Iterator<Item = &S::Elem> + '_ {
        let slice = self.data.as_slice();
        OffsetIter::new(&self.shape, &self.strides).map(move |offset| &slice[offset])
    }

    /// Creates an owned, contiguous copy of the array with the same policy.
    pub fn to_owned(&self) -> Result<Array<S::Elem, P>, TensorError>
    where
        S::Elem: Clone,
    {
        let data: Vec<S::Elem> = self.iter().cloned().collect();
        let storage = TensorStorage::from_vec(data, CpuAllocator)?;
        Ok(ArrayBase::from_parts(
            storage,
            self.shape.clone(),
            layout::get_strides_from_shape(&self.shape),
        ))
    }

    /// Apply a function to each element of the array.
    ///
    /// # Example
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<u8>::from_shape_vec(&[4], vec![1, 2, 3, 4], CpuAllocator).unwrap();
    /// let b = a.map(|x| *x as f32 * 0.5).unwrap();
    /// assert_eq!(b.as_slice(), &[0.5, 1.0, 1.5, 2.0]);
    /// ```
    pub fn map<U, F>(&self, f: F) -> Result<Array<U, P>, TensorError>
    where
        F: Fn(&S::Elem) -> U,
    {
        let data: Vec<U> = self.iter().map(f).collect();
        let storage = TensorStorage::from_vec(data, CpuAllocator)?;
        Ok(ArrayBase::from_parts(
            storage,
            self.shape.clone(),
            layout::get_strides_from_shape(&self.shape),
        ))
    }

    /// Cast the array to a new element type.
    pub fn cast<U>(&self) -> Result<Array<U, P>, TensorError>
    where
        U: From<S::Elem>,
        S::Elem: Clone,
    {
        self.map(|x| U::from(x.clone()))
    }

    /// Returns a new array with the given shape sharing the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the element count changes and
    /// [`TensorError::Unsupported`] if the array is not contiguous.
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<i32>::from_shape_vec(&[6], vec![1, 2, 3, 4, 5, 6], CpuAllocator).unwrap();
    /// let b = a.reshape(&[2, 3]).unwrap();
    /// assert_eq!(b[[1, 0]], 4);
    /// ```
    pub fn reshape(self, shape: &[usize]) -> Result<Self, TensorError> {
        layout::validate_shape(shape)?;
        if layout::numel(shape) != self.numel() {
            return Err(TensorError::shape_mismatch(
                "reshape must preserve the number of elements",
                &self.shape,
                shape,
            ));
        }
        if !self.is_standard_layout() {
            return Err(TensorError::unsupported(
                "reshape",
                "the array is not contiguous in row-major order",
            ));
        }
        Ok(Self::from_parts(
            self.data,
            shape.to_vec(),
            layout::get_strides_from_shape(shape),
        ))
    }

    /// Changes the shape of the array, reallocating the buffer.
    ///
    /// Resizing to the current shape keeps the contents. Any other shape
    /// replaces every element with `T::default()` and invalidates pointers
    /// previously taken into the buffer.
    ///
    /// # Errors
    ///
    /// Views never own their buffer and fail with [`TensorError::Unsupported`].
    pub fn resize(&mut self, shape: &[usize]) -> Result<(), TensorError>
    where
        S::Elem: Clone + Default,
    {
        if !self.data.is_owned() {
            return Err(TensorError::unsupported(
                "resize",
                "a view does not own its buffer and cannot reallocate",
            ));
        }
        layout::validate_shape(shape)?;
        if shape == self.shape.as_slice() {
            return Ok(());
        }
        self.data.reallocate(layout::numel(shape))?;
        self.shape = shape.to_vec();
        self.strides = layout::get_strides_from_shape(shape);
        Ok(())
    }

    /// Compares two arrays element-wise in logical order.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the shapes differ.
    pub fn try_eq<S2, Q>(&self, other: &ArrayBase<S2, Q>) -> Result<bool, TensorError>
    where
        S2: Data,
        Q: IndexPolicy,
        S::Elem: PartialEq<S2::Elem>,
    {
        if self.shape != other.shape {
            return Err(TensorError::shape_mismatch(
                "equality requires identical shapes",
                &self.shape,
                &other.shape,
            ));
        }
        Ok(self.iter().zip(other.iter()).all(|(a, b)| a == b))
    }
}

impl<S: DataMut, P: IndexPolicy> ArrayBase<S, P> {
    /// Returns the whole backing buffer mutably.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [S::Elem] {
        self.data.as_mut_slice()
    }

    /// Returns the mutable pointer to the first element of the backing buffer.
    #[inline]
    pub fn as_mut_ptr(&mut self) -> *mut S::Elem {
        self.data.as_mut_slice().as_mut_ptr()
    }

    /// Returns a mutable reference to the element at `index`.
    pub fn get_mut(&mut self, index: &[P::Index]) -> Result<&mut S::Elem, TensorError> {
        let offset = self.offset(index)?;
        Ok(&mut self.data.as_mut_slice()[offset])
    }

    /// Returns a mutable reference to the `flat`-th element in logical order.
    pub fn get_flat_mut(&mut self, flat: usize) -> Result<&mut S::Elem, TensorError> {
        let offset = self.flat_offset(flat)?;
        Ok(&mut self.data.as_mut_slice()[offset])
    }

    /// Apply a function to each addressed element in place.
    pub fn map_inplace<F>(&mut self, mut f: F)
    where
        F: FnMut(&mut S::Elem),
    {
        let slice = self.data.as_mut_slice();
        for offset in OffsetIter::new(&self.shape, &self.strides) {
            f(&mut slice[offset]);
        }
    }

    /// Sets every addressed element to `value`.
    pub fn fill(&mut self, value: S::Elem)
    where
        S::Elem: Clone,
    {
        self.map_inplace(|x| *x = value.clone());
    }

    /// Sets every addressed element to zero.
    pub fn set_zero(&mut self)
    where
        S::Elem: Zero + Clone,
    {
        self.fill(S::Elem::zero());
    }

    /// Sets every addressed element to one.
    pub fn set_ones(&mut self)
    where
        S::Elem: One + Clone,
    {
        self.fill(S::Elem::one());
    }

    /// Copies the elements of `other` into this array.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::ShapeMismatch`] if the shapes differ.
    pub fn assign<S2, Q>(&mut self, other: &ArrayBase<S2, Q>) -> Result<(), TensorError>
    where
        S2: Data<Elem = S::Elem>,
        Q: IndexPolicy,
        S::Elem: Clone,
    {
        if self.shape != other.shape {
            return Err(TensorError::shape_mismatch(
                "assign requires identical shapes",
                &self.shape,
                &other.shape,
            ));
        }
        let mut values = other.iter();
        self.map_inplace(|x| {
            if let Some(v) = values.next() {
                *x = v.clone();
            }
        });
        Ok(())
    }
}

impl<T, P: IndexPolicy, A: TensorAllocator> Array<T, P, A> {
    /// Creates an array from a flat vector in row-major order.
    ///
    /// # Arguments
    ///
    /// * `shape` - The shape of the array, every dimension at least 1.
    /// * `data` - The elements, `numel(shape)` of them.
    /// * `alloc` - The allocator backing the buffer.
    ///
    /// # Errors
    ///
    /// Returns [`TensorError::LengthMismatch`] if `data` does not hold
    /// exactly `numel(shape)` elements.
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>, alloc: A) -> Result<Self, TensorError> {
        layout::validate_shape(shape)?;
        let numel = layout::numel(shape);
        if numel != data.len() {
            return Err(TensorError::length_mismatch(numel, data.len()));
        }
        let storage = TensorStorage::from_vec(data, alloc)?;
        Ok(Self::from_parts(
            storage,
            shape.to_vec(),
            layout::get_strides_from_shape(shape),
        ))
    }

    /// Creates an array by copying a flat slice in row-major order.
    pub fn from_shape_slice(shape: &[usize], data: &[T], alloc: A) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        Self::from_shape_vec(shape, data.to_vec(), alloc)
    }

    /// Creates an array with every element set to `value`.
    pub fn from_shape_val(shape: &[usize], value: T, alloc: A) -> Result<Self, TensorError>
    where
        T: Clone,
    {
        layout::validate_shape(shape)?;
        Self::from_shape_vec(shape, vec![value; layout::numel(shape)], alloc)
    }

    /// Creates an array by evaluating `f` at every multi-index in row-major order.
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let eye = Array::<f64>::from_shape_fn(&[2, 2], CpuAllocator, |ij| {
    ///     if ij[0] == ij[1] { 1.0 } else { 0.0 }
    /// })
    /// .unwrap();
    /// assert_eq!(eye.as_slice(), &[1.0, 0.0, 0.0, 1.0]);
    /// ```
    pub fn from_shape_fn<F>(shape: &[usize], alloc: A, f: F) -> Result<Self, TensorError>
    where
        F: Fn(&[usize]) -> T,
    {
        layout::validate_shape(shape)?;
        let numel = layout::numel(shape);
        let mut data = Vec::with_capacity(numel);
        let mut index = vec![0; shape.len()];
        for _ in 0..numel {
            data.push(f(&index));
            for dim in (0..shape.len()).rev() {
                index[dim] += 1;
                if index[dim] < shape[dim] {
                    break;
                }
                index[dim] = 0;
            }
        }
        Self::from_shape_vec(shape, data, alloc)
    }

    /// Creates an array with default-valued elements.
    pub fn new(shape: &[usize], alloc: A) -> Result<Self, TensorError>
    where
        T: Clone + Default,
    {
        Self::from_shape_val(shape, T::default(), alloc)
    }

    /// Creates an array filled with zeros.
    pub fn zeros(shape: &[usize], alloc: A) -> Result<Self, TensorError>
    where
        T: Clone + Zero,
    {
        Self::from_shape_val(shape, T::zero(), alloc)
    }

    /// Creates an array filled with ones.
    pub fn ones(shape: &[usize], alloc: A) -> Result<Self, TensorError>
    where
        T: Clone + One,
    {
        Self::from_shape_val(shape, T::one(), alloc)
    }

    /// Creates an array holding `0, 1, 2, ...` in row-major order.
    ///
    /// ```rust
    /// use tenmat_tensor::{Array, CpuAllocator};
    ///
    /// let a = Array::<f64>::arange(&[2, 2], CpuAllocator).unwrap();
    /// assert_eq!(a.as_slice(), &[0.0, 1.0, 2.0, 3.0]);
    /// ```
    pub fn arange(shape: &[usize], alloc: A) -> Result<Self, TensorError>
    where
        T: Clone + Zero + One,
    {
        layout::validate_shape(shape)?;
        let mut next = T::zero();
        let data = (0..layout::numel(shape))
            .map(|_| {
                let value = next.clone();
                next = next.clone() + T::one();
                value
            })
            .collect();
        Self::from_shape_vec(shape, data, alloc)
    }

    /// Consumes the array and returns its elements in row-major order.
    pub fn into_vec(self) -> Vec<T> {
        self.data.into_vec()
    }

    /// Returns the underlying storage.
    #[inline]
    pub fn storage(&self) -> &TensorStorage<T, A> {
        &self.data
    }
}

impl<S, P, const K: usize> std::ops::Index<[P::Index; K]> for ArrayBase<S, P>
where
    S: Data,
    P: IndexPolicy,
{
    type Output = S::Elem;

    /// # Panics
    ///
    /// Panics where [`ArrayBase::get`] returns an error.
    fn index(&self, index: [P::Index; K]) -> &S::Elem {
        match self.get(&index) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<S, P, const K: usize> std::ops::IndexMut<[P::Index; K]> for ArrayBase<S, P>
where
    S: DataMut,
    P: IndexPolicy,
{
    /// # Panics
    ///
    /// Panics where [`ArrayBase::get_mut`] returns an error.
    fn index_mut(&mut self, index: [P::Index; K]) -> &mut S::Elem {
        match self.get_mut(&index) {
            Ok(value) => value,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<S, S2, P, Q> PartialEq<ArrayBase<S2, Q>> for ArrayBase<S, P>
where
    S: Data,
    S2: Data,
    P: IndexPolicy,
    Q: IndexPolicy,
    S::Elem: PartialEq<S2::Elem>,
{
    /// # Panics
    ///
    /// Comparing arrays of different shapes is a caller error and panics,
    /// use [`ArrayBase::try_eq`] to get a [`TensorError::ShapeMismatch`] instead.
    fn eq(&self, other: &ArrayBase<S2, Q>) -> bool {
        match self.try_eq(other) {
            Ok(eq) => eq,
            Err(e) => panic!("{e}"),
        }
    }
}

impl<S: Clone, P: IndexPolicy> Clone for ArrayBase<S, P> {
    fn clone(&self) -> Self {
        Self::from_parts(self.data.clone(), self.shape.clone(), self.strides.clone())
    }
}

impl<S, P> std::fmt::Debug for ArrayBase<S, P>
where
    S: Data,
    S::Elem: std::fmt::Debug,
    P: IndexPolicy,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ArrayBase")
            .field("shape", &self.shape)
            .field("strides", &self.strides)
            .field("policy", &P::default())
            .field("data", &self.iter().collect::<Vec<_>>())
            .finish()
    }
}

impl<S, P> std::fmt::Display for ArrayBase<S, P>
where
    S: Data,
    S::Elem: std::fmt::Display,
    P: IndexPolicy,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let rank = self.ndim();
        let values: Vec<String> = self.iter().map(|v| format!("{v}")).collect();
        if rank == 0 {
            return write!(f, "{}", values.concat());
        }
        let width = values.iter().map(|v| v.len()).max().unwrap_or(0);
        let total = values.len();

        for (i, value) in values.iter().enumerate() {
            // count the axes opening before and closing after this element
            let mut opens = 0;
            let mut closes = 0;
            let mut block = 1;
            for &size in self.shape.iter().rev() {
                block *= size;
                if i % block == 0 {
                    opens += 1;
                }
                if (i + 1) % block == 0 {
                    closes += 1;
                }
            }
            let indent = if i == 0 || opens == 0 { 0 } else { rank - opens };
            write!(
                f,
                "{}{}{value:>width$}{}",
                " ".repeat(indent),
                "[".repeat(opens),
                "]".repeat(closes)
            )?;
            if i + 1 < total {
                if closes == 0 {
                    write!(f, ", ")?;
                } else {
                    write!(f, ",{}", "\n".repeat(closes))?;
                }
            }
        }
        Ok(())
    }
}
