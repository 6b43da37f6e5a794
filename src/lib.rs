pub mod core;
pub mod analysis;
pub mod index;
pub mod query;
pub mod scoring;
pub mod search;
pub mod parallel;

pub use crate::core::engine::{SearchEngine, MAX_RESULT_DOCUMENT_COUNT};
pub use crate::core::error::{Error, ErrorKind, Result};
pub use crate::core::types::{DocId, Document, DocumentStatus};

/*
┌──────────────────────────────────────────────────────────────────────────┐
│                          FINDEX STRUCT ARCHITECTURE                      │
└──────────────────────────────────────────────────────────────────────────┘

┌────────────────────────────────── CORE ──────────────────────────────────┐
│                                                                          │
│  ┌────────────────────────────────────────────────────────────────┐      │
│  │                      struct SearchEngine                       │      │
│  │  ┌──────────────────────────────────────────────────────────┐  │      │
│  │  │ config: Config             // shard count, cache size    │  │      │
│  │  │ stop_words: StopWordSet    // fixed at construction      │  │      │
│  │  │ index: InvertedIndex       // forward + reverse + ids    │  │      │
│  │  │ cache: QueryCache          // LRU, cleared on mutation   │  │      │
│  │  └──────────────────────────────────────────────────────────┘  │      │
│  └────────────────────────────────────────────────────────────────┘      │
│                                                                          │
│  ┌─────────────────┐  ┌──────────────────────┐  ┌───────────────────┐    │
│  │ struct DocId    │  │ enum DocumentStatus  │  │ struct Document   │    │
│  │ • 0: i32        │  │ • Actual             │  │ • id: DocId       │    │
│  └─────────────────┘  │ • Irrelevant         │  │ • relevance: f64  │    │
│                       │ • Banned             │  │ • rating: i32     │    │
│                       │ • Removed            │  └───────────────────┘    │
│                       └──────────────────────┘                           │
└──────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────────── INDEXING ────────────────────────────────┐
│                                                                          │
│  ┌────────────────────────────────────────────────────────────────┐      │
│  │                     struct InvertedIndex                       │      │
│  │  ┌──────────────────────────────────────────────────────────┐  │      │
│  │  │ word_docs: BTreeMap<String, BTreeMap<DocId, f64>>        │  │      │
│  │  │ documents: BTreeMap<DocId, DocumentMeta>  // reverse map │  │      │
│  │  │ ids: BTreeSet<DocId>                      // ascending   │  │      │
│  │  └──────────────────────────────────────────────────────────┘  │      │
│  └────────────────────────────────────────────────────────────────┘      │
│                                                                          │
│  DocumentMeta • rating • status • word_frequency (tf per word, Σ = 1.0)  │
└──────────────────────────────────────────────────────────────────────────┘

┌──────────────────────────── QUERY & SCORING ─────────────────────────────┐
│                                                                          │
│  QueryParser ──parses──> Query { plus_words, minus_words } (disjoint)    │
│                                                                          │
│  TfIdfScorer ──reads──> InvertedIndex                                    │
│      • score():     plus-word loop, predicate filter, minus pruning      │
│      • score_par(): rayon fan-out per plus word into ConcurrentMap       │
│                                                                          │
│  QueryCache ──stores──> ranked Vec<Document> keyed by (query, status)    │
└──────────────────────────────────────────────────────────────────────────┘

┌─────────────────────────────── PARALLEL ─────────────────────────────────┐
│                                                                          │
│  ConcurrentMap<K, V> — fixed buckets, parking_lot mutex per bucket,      │
│      scoped access guard, snapshot() merge, erase()                      │
│                                                                          │
│  process_queries() — rayon fan-out, output order == input order          │
│  process_queries_joined() — flattened, ranking order preserved           │
└──────────────────────────────────────────────────────────────────────────┘
*/
