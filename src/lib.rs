#![deny(missing_docs)]
//! A skip list set is an ordered set stored in a skip list. It is a
//! probabilistic data structure that allows for fast insertion, deletion, and
//! lookup of elements while keeping them in sorted order.
//!
//! A skip list is a linked list with a number of levels. The bottom level
//! holds every element in ascending order, and each level above it holds a
//! random subset of the level below. The higher levels skip over a large
//! number of nodes, which makes lookup operations efficient.
//!
//! Every element is given a random height when it is inserted: starting at
//! 1, a coin is flipped and the height grows for as long as it comes up
//! heads. The number of levels in the set grows with the number of elements
//! so that it never falls below `log2(len + 1)`.
//!
//! Here are some of the properties of a skip list set:
//!
//! - Expected O(log n) insertion, removal, and membership checks
//! - Iteration in ascending order
//! - No rebalancing on the hot path; [`SkipListSet::rebalance`] rebuilds the
//!   structure with fresh randomness on request
//!
//! Here are some of its limitations:
//!
//! - It is single threaded; mutation requires exclusive access
//! - Range views (`sub_set`, `head_set`, `tail_set`) and `retain_all` are not
//!   provided and report [`SkipListError::Unsupported`]
//! - Elements are ordered by their [`Ord`] implementation only
//!
//! This implementation is based on the one documented in William Pugh's 1990
//! paper ["Skip Lists: A Probabilistic Alternative to Balanced Trees"].
//!
//! ["Skip Lists: A Probabilistic Alternative to Balanced Trees"]: https://15721.courses.cs.cmu.edu/spring2018/papers/08-oltpindexes1/pugh-skiplists-cacm1990.pdf
//!
//! # Examples
//!
//! The following examples are adapted from the examples in the Rust standard
//! library documentation for [`BTreeSet`].
//!
//! ```
//! use skipset::SkipListSet;
//!
//! let mut books: SkipListSet<String> = SkipListSet::new();
//!
//! // Add some books.
//! books.insert("A Dance With Dragons".to_string());
//! books.insert("To Kill a Mockingbird".to_string());
//! books.insert("The Odyssey".to_string());
//! books.insert("The Great Gatsby".to_string());
//!
//! // Check for a specific one.
//! // When collections store owned values (String), they can still be
//! // queried using references (&str).
//! if !books.contains("The Winds of Winter") {
//!     println!("We have {} books, but The Winds of Winter ain't one.",
//!              books.len());
//! }
//!
//! // Remove a book.
//! books.remove("The Odyssey");
//!
//! // The smallest and largest books.
//! assert_eq!(books.first().unwrap(), "A Dance With Dragons");
//! assert_eq!(books.last().unwrap(), "To Kill a Mockingbird");
//!
//! // Iterate over everything, in order.
//! for book in &books {
//!     println!("{book}");
//! }
//! ```
//!
//! A `SkipListSet` with a known list of items can be initialized from an
//! array. Duplicates collapse:
//!
//! ```
//! use skipset::SkipListSet;
//!
//! let set = SkipListSet::from([4, 2, 2, 8]);
//! assert_eq!(set.len(), 3);
//! assert_eq!(set.iter().copied().collect::<Vec<_>>(), [2, 4, 8]);
//! ```
//!
//! The easiest way to use `SkipListSet` with a custom type is to derive
//! [`Ord`]. This requires that the type derive [`PartialEq`], [`Eq`], and
//! [`PartialOrd`] as well.
//!
//! ```
//! use skipset::SkipListSet;
//!
//! #[derive(Debug, PartialEq, Eq, PartialOrd, Ord)]
//! struct Fighter {
//!     health: usize,
//!     name: String,
//! }
//!
//! impl Fighter {
//!     fn new(name: &str, health: usize) -> Fighter {
//!         Fighter { health, name: name.to_string() }
//!     }
//! }
//!
//! let fighters: SkipListSet<Fighter> = SkipListSet::from([
//!     Fighter::new("Zangief", 1075),
//!     Fighter::new("Akuma", 900),
//!     Fighter::new("Chun Li", 975),
//! ]);
//!
//! // Ordered by health first.
//! assert_eq!(fighters.first().unwrap().name, "Akuma");
//! ```
//!
//! Tower heights can be made reproducible with a [`Config`]:
//!
//! ```
//! use skipset::{Config, SkipListSet};
//!
//! let config = Config::new().seed(1337);
//! let mut a: SkipListSet<u32> = SkipListSet::with_config(&config).unwrap();
//! let mut b: SkipListSet<u32> = SkipListSet::with_config(&config).unwrap();
//! a.insert_all(0..100);
//! b.insert_all(0..100);
//! assert_eq!(a.height(), b.height());
//! ```
//!
//! [`BTreeSet`]: https://doc.rust-lang.org/std/collections/struct.BTreeSet.html
mod config;
mod error;
mod graph;
mod iter;
mod level;
mod skip_list_set;

pub use config::Config;
pub use error::{Result, SkipListError};
pub use iter::{IntoIter, Iter};
pub use level::{GeometricLevels, LevelGenerator, DEFAULT_PROBABILITY};
pub use skip_list_set::SkipListSet;
