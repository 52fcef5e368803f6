use crate::depth::Depth;

#[test]
fn test_depth_empty() {
    let depth = Depth::new();
    assert_eq!(depth.samples(), 0);
    assert_eq!(depth.mean(), 0);
    assert!(depth.percentiles().is_empty());
}

#[test]
fn test_depth_sample() {
    let mut depth = Depth::new();
    for d in [3, 4, 4, 5, 2].iter() {
        depth.sample(*d);
    }
    assert_eq!(depth.samples(), 5);
    assert_eq!(depth.min(), 2);
    assert_eq!(depth.max(), 5);
    assert_eq!(depth.mean(), 3);
}

#[test]
fn test_depth_percentiles() {
    let mut depth = Depth::new();
    (0..90).for_each(|_| depth.sample(10));
    (0..9).for_each(|_| depth.sample(11));
    depth.sample(20);

    assert_eq!(depth.percentiles(), vec![(90, 10), (99, 11), (100, 20)]);
    assert_eq!(
        depth.json(),
        "{ \"min\": 10, \"mean\": 10, \"max\": 20, \"percentiles\": { \"90\": 10, \"99\": 11, \"100\": 20 } }"
    );
}
