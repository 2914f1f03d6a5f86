/// Maximum number of entries SQS accepts in one `DeleteMessageBatch` call.
pub const DELETE_BATCH_SIZE: usize = 10;

/// Splits `items` into consecutive chunks of `size`, the last one holding the remainder.
///
/// Order is preserved and an empty input yields no chunks. A `size` of zero is
/// treated as one.
pub fn chunk<T>(items: &[T], size: usize) -> Vec<&[T]> {
    items.chunks(size.max(1)).collect()
}
