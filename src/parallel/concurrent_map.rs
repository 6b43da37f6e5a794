use parking_lot::{MappedMutexGuard, Mutex, MutexGuard};
use std::collections::BTreeMap;

use crate::core::types::DocId;

/// Integer-like keys that can pick a bucket. The map supports only such
/// keys; floats and strings have no place here.
pub trait ShardKey: Ord + Copy {
    fn shard_hint(&self) -> u64;
}

macro_rules! impl_shard_key {
    ($($ty:ty),*) => {
        $(impl ShardKey for $ty {
            fn shard_hint(&self) -> u64 {
                *self as u64
            }
        })*
    };
}

impl_shard_key!(i32, i64, u32, u64, usize);

impl ShardKey for DocId {
    fn shard_hint(&self) -> u64 {
        self.0 as u64
    }
}

/// Fixed-bucket concurrent map: each bucket is an ordered map behind its
/// own mutex. Writers touching different buckets never contend; writers on
/// the same bucket serialize on its lock and nothing else.
pub struct ConcurrentMap<K, V> {
    buckets: Vec<Mutex<BTreeMap<K, V>>>,
}

impl<K: ShardKey, V: Default> ConcurrentMap<K, V> {
    pub fn new(bucket_count: usize) -> Self {
        let bucket_count = bucket_count.max(1);
        ConcurrentMap {
            buckets: (0..bucket_count).map(|_| Mutex::new(BTreeMap::new())).collect(),
        }
    }

    fn bucket(&self, key: &K) -> &Mutex<BTreeMap<K, V>> {
        let index = key.shard_hint() % self.buckets.len() as u64;
        &self.buckets[index as usize]
    }

    /// Lock the key's bucket and return a guard over its value slot,
    /// default-inserting when absent. The bucket stays locked for the
    /// guard's lifetime and is released on every exit path.
    pub fn access(&self, key: K) -> MappedMutexGuard<'_, V> {
        let guard = self.bucket(&key).lock();
        MutexGuard::map(guard, |bucket| bucket.entry(key).or_default())
    }

    /// Merge every bucket into one ordered map, locking each bucket in turn.
    pub fn snapshot(&self) -> BTreeMap<K, V>
    where
        V: Clone,
    {
        let mut merged = BTreeMap::new();
        for bucket in &self.buckets {
            let bucket = bucket.lock();
            merged.extend(bucket.iter().map(|(k, v)| (*k, v.clone())));
        }
        merged
    }

    /// Lock the key's bucket and drop the entry if present.
    pub fn erase(&self, key: K) {
        self.bucket(&key).lock().remove(&key);
    }
}
