use crate::{
    allocator::TensorAllocator,
    array::{Array, ArrayBase},
    data::Data,
    policy::IndexPolicy,
};

impl<S, P> bincode::enc::Encode for ArrayBase<S, P>
where
    S: Data,
    S::Elem: bincode::enc::Encode,
    P: IndexPolicy,
{
    fn encode<E: bincode::enc::Encoder>(
        &self,
        encoder: &mut E,
    ) -> Result<(), bincode::error::EncodeError> {
        bincode::Encode::encode(&self.shape().to_vec(), encoder)?;
        // same layout as a Vec: length prefix then the elements in logical order
        bincode::Encode::encode(&(self.numel() as u64), encoder)?;
        for value in self.iter() {
            bincode::Encode::encode(value, encoder)?;
        }
        Ok(())
    }
}

impl<T, P, A, C> bincode::de::Decode<C> for Array<T, P, A>
where
    T: bincode::de::Decode<C>,
    P: IndexPolicy,
    A: TensorAllocator + Default + 'static,
{
    fn decode<D: bincode::de::Decoder<Context = C>>(
        decoder: &mut D,
    ) -> Result<Self, bincode::error::DecodeError> {
        let shape: Vec<usize> = bincode::Decode::decode(decoder)?;
        let data: Vec<T> = bincode::Decode::decode(decoder)?;
        Array::from_shape_vec(&shape, data, A::default()).map_err(|e| {
            bincode::error::DecodeError::OtherString(format!("Array error: {e}"))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{allocator::CpuAllocator, view::ArrayView};

    #[test]
    fn test_bincode() -> Result<(), Box<dyn std::error::Error>> {
        let array = Array::<u8>::from_shape_vec(&[2, 3], vec![1, 2, 3, 4, 5, 6], CpuAllocator)?;
        let mut serialized = vec![0u8; 100];
        let config = bincode::config::standard();
        let length = bincode::encode_into_slice(&array, &mut serialized, config)?;
        let deserialized: (Array<u8>, usize) =
            bincode::decode_from_slice(&serialized[..length], config)?;
        assert_eq!(array, deserialized.0);
        Ok(())
    }

    #[test]
    fn test_bincode_strided_view() -> Result<(), Box<dyn std::error::Error>> {
        let buffer = [1i32, 2, 3, 4];
        let view = ArrayView::<i32>::from_shape_strides(&[2, 2], &[1, 2], &buffer)?;
        let config = bincode::config::standard();
        let bytes = bincode::encode_to_vec(&view, config)?;
        let (decoded, _): (Array<i32>, usize) = bincode::decode_from_slice(&bytes, config)?;
        assert_eq!(decoded.as_slice(), &[1, 3, 2, 4]);
        Ok(())
    }
}
