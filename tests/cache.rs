//! Cached reads agree with the reader they wrap.

use std::io::Cursor;

use lasindex::{CachedReader, Header, Point, Reader, Version, Writer, point::Format};
use rand::{Rng, SeedableRng, rngs::StdRng};

const COUNT: u64 = 250;

fn bytes() -> Vec<u8> {
    let mut header = Header::default();
    header.set_version(Version::new(1, 1)).unwrap();
    header.set_point_format(Format::new(1).unwrap());
    let mut writer = Writer::new(Cursor::new(Vec::new()), header).unwrap();
    for i in 0..COUNT {
        writer
            .write_point(Point {
                x: i as f64,
                y: (i * 2) as f64,
                intensity: i as u16,
                gps_time: Some(i as f64 / 4.),
                ..Default::default()
            })
            .unwrap();
    }
    writer.into_inner().unwrap().into_inner()
}

fn reader() -> Reader {
    Reader::new(Cursor::new(bytes())).unwrap()
}

#[test]
fn sequential_agrees_across_window_boundaries() {
    for capacity in [0, 1, 7, 100, 249, 250, 1000] {
        let mut cached = CachedReader::new(reader(), capacity);
        let mut uncached = reader();
        loop {
            let expected = uncached.read_point().unwrap();
            assert_eq!(expected, cached.read_point().unwrap());
            if expected.is_none() {
                break;
            }
        }
        assert!(cached.read_point().is_err());
    }
}

#[test]
fn random_agrees() {
    let mut rng = StdRng::seed_from_u64(42);
    let mut cached = CachedReader::new(reader(), 16);
    let mut uncached = reader();
    for _ in 0..500 {
        let index = if rng.gen_range(0..10) == 0 {
            rng.gen_range(0..COUNT)
        } else {
            rng.gen_range(100..110)
        };
        assert_eq!(
            uncached.read_point_at(index).unwrap(),
            cached.read_point_at(index).unwrap()
        );
    }
    assert!(cached.hits() > cached.misses());
    assert_eq!(500, cached.hits() + cached.misses());
}

#[test]
fn whole_file_window() {
    let mut cached = CachedReader::new(reader(), 0);
    assert_eq!(COUNT as usize, cached.capacity());
    assert_eq!(0., cached.read_point_at(0).unwrap().x);
    for i in (0..COUNT).rev() {
        assert_eq!(i as f64, cached.read_point_at(i).unwrap().x);
    }
    assert_eq!(1, cached.misses());
}

#[test]
fn random_then_sequential() {
    let mut cached = CachedReader::new(reader(), 10);
    assert_eq!(30., cached.read_point_at(30).unwrap().x);
    assert_eq!(31., cached.read_point().unwrap().unwrap().x);
    cached.reset();
    assert_eq!(0., cached.read_point().unwrap().unwrap().x);
    let reader = cached.into_inner();
    assert_eq!(COUNT, reader.header().number_of_points());
}
