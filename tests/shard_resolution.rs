//! Integration tests for routing rows to range and hash shards.

#[cfg(test)]
mod tests {
    use proptest::prelude::*;
    use range_shard_spec::range::RangeError;
    use range_shard_spec::resolve::ResolveError;
    use range_shard_spec::spec::{BuildingRangeShard, HashBucket, RangeBucket};
    use range_shard_spec::{
        resolve, Bound, BucketShardSpec, DimensionList, Error, MapInputRow, PartitionSet,
        ResolverConfig, SearchStrategy, ShardLookup, StringTuple,
    };

    fn dims() -> DimensionList {
        DimensionList::new(["country", "city"])
    }

    fn row(country: &str, city: &str) -> MapInputRow {
        MapInputRow::from_pairs([("country", country), ("city", city)])
    }

    /// Partition A covers everything below ("US", "Boston"), partition B the rest.
    fn boston_split() -> Vec<BuildingRangeShard> {
        let boston = StringTuple::of(["US", "Boston"]);
        vec![
            RangeBucket::new(0, dims(), Bound::Unbounded, boston.clone())
                .unwrap()
                .convert(0),
            RangeBucket::new(1, dims(), boston, Bound::Unbounded)
                .unwrap()
                .convert(1),
        ]
    }

    fn tiling(boundaries: &[(String, String)]) -> Vec<RangeBucket> {
        let mut bounds = vec![Bound::Unbounded];
        bounds.extend(
            boundaries
                .iter()
                .map(|(a, b)| Bound::from(StringTuple::of([a.as_str(), b.as_str()]))),
        );
        bounds.push(Bound::Unbounded);

        bounds
            .windows(2)
            .enumerate()
            .map(|(id, pair)| {
                RangeBucket::new(id as u32, dims(), pair[0].clone(), pair[1].clone()).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_boston_split_scenario() {
        let shards = boston_split();

        assert_eq!(resolve(&shards, &row("US", "Austin")).unwrap().partition_id(), 0);
        assert_eq!(resolve(&shards, &row("US", "Boston")).unwrap().partition_id(), 1);
        assert_eq!(resolve(&shards, &row("US", "Zurich")).unwrap().partition_id(), 1);
        assert_eq!(resolve(&shards, &row("CA", "Toronto")).unwrap().partition_id(), 0);
    }

    #[test]
    fn test_boston_split_through_partition_set() {
        for search in [SearchStrategy::Linear, SearchStrategy::Binary] {
            let config = ResolverConfig::new(search, true);
            let set = PartitionSet::new(boston_split(), &config).unwrap();

            assert_eq!(set.resolve(&row("US", "Austin")).unwrap().partition_id(), 0);
            assert_eq!(set.resolve(&row("US", "Boston")).unwrap().partition_id(), 1);
            assert_eq!(set.resolve(&row("US", "Zurich")).unwrap().partition_id(), 1);
            assert_eq!(set.resolve(&row("CA", "Toronto")).unwrap().partition_id(), 0);
        }
    }

    #[test]
    fn test_uncovered_row_fails() {
        let shards = vec![
            RangeBucket::new(
                0,
                dims(),
                Bound::Unbounded,
                StringTuple::of(["US", "Boston"]),
            )
            .unwrap(),
            RangeBucket::new(
                1,
                dims(),
                StringTuple::of(["US", "Boston"]),
                StringTuple::of(["ZZ", "A"]),
            )
            .unwrap(),
        ];

        let err = resolve(&shards, &row("ZZ", "Nowhere")).unwrap_err();
        match err {
            Error::Resolve(ResolveError::NoMatchingPartition { row, candidates }) => {
                assert!(row.contains("ZZ"));
                assert!(row.contains("Nowhere"));
                assert_eq!(candidates.len(), 2);
                assert!(candidates[1].contains("end=[\"ZZ\", \"A\"]"));
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_boundary_rejected() {
        let err = RangeBucket::new(0, dims(), StringTuple::of(["US"]), Bound::Unbounded)
            .unwrap_err();
        assert!(matches!(err, RangeError::InvalidBoundary { .. }));

        let err: Error = err.into();
        assert!(err.to_string().contains("Start tuple must either be null"));
    }

    #[test]
    fn test_missing_and_multi_valued_dimensions_route_low() {
        let shards = boston_split();

        let mut multi = row("US", "Zurich");
        multi.set_multi("country", ["US", "CA"]);
        assert_eq!(resolve(&shards, &multi).unwrap().partition_id(), 0);

        let missing = MapInputRow::from_pairs([("city", "Zurich")]);
        assert_eq!(resolve(&shards, &missing).unwrap().partition_id(), 0);
    }

    #[test]
    fn test_bucket_lifecycle() {
        let bucket = BucketShardSpec::Range(
            RangeBucket::new(5, dims(), StringTuple::of(["US", "Boston"]), Bound::Unbounded)
                .unwrap(),
        );

        let building = bucket.convert(2);
        assert_eq!(building, bucket.convert(2));
        assert_eq!(building.bucket_id(), 5);
        assert_eq!(building.partition_id(), 2);

        let published = building.convert(3);
        assert_eq!(published.partition_id(), 2);
        assert_eq!(published.num_core_partitions(), 3);
        assert!(published.is_in_chunk(&row("US", "Denver")).unwrap());
        assert!(!published.is_in_chunk(&row("US", "Austin")).unwrap());
    }

    #[test]
    fn test_hash_buckets_cover_every_row() {
        let dims = DimensionList::new(["country"]);
        let shards: Vec<BucketShardSpec> = (0..5)
            .map(|id| BucketShardSpec::Hash(HashBucket::new(id, 5, dims.clone()).unwrap()))
            .collect();

        for i in 0..200 {
            let r = MapInputRow::from_pairs([("country", format!("country-{}", i))]);
            let matches = shards.iter().filter(|s| s.is_in_chunk(&r).unwrap()).count();
            assert_eq!(matches, 1);
            assert!(resolve(&shards, &r).is_ok());
        }
    }

    proptest! {
        #[test]
        fn tiled_ranges_resolve_every_row(
            boundaries in prop::collection::btree_set(("[a-e]{1,2}", "[a-e]{0,2}"), 0..6),
            country in "[a-f]{0,3}",
            city in "[a-f]{0,3}",
        ) {
            let boundaries: Vec<(String, String)> = boundaries.into_iter().collect();
            let shards = tiling(&boundaries);
            let r = row(&country, &city);

            let matches = shards.iter().filter(|s| s.is_in_chunk(&r).unwrap()).count();
            prop_assert_eq!(matches, 1);

            let linear = resolve(&shards, &r).unwrap().bucket_id();
            let set = PartitionSet::new(shards, &ResolverConfig::default()).unwrap();
            prop_assert_eq!(set.resolve(&r).unwrap().bucket_id(), linear);
        }

        #[test]
        fn membership_follows_half_open_bounds(
            start in ("[a-c]{0,2}", "[a-c]{0,2}"),
            end in ("[a-c]{0,2}", "[a-c]{0,2}"),
            value in ("[a-c]{0,2}", "[a-c]{0,2}"),
        ) {
            let start = StringTuple::of([start.0, start.1]);
            let end = StringTuple::of([end.0, end.1]);
            let tuple = StringTuple::of([value.0.clone(), value.1.clone()]);
            let bucket = RangeBucket::new(0, dims(), start.clone(), end.clone()).unwrap();

            let expected = start <= tuple && tuple < end;
            prop_assert_eq!(bucket.is_in_chunk(&row(&value.0, &value.1)).unwrap(), expected);
        }
    }
}
