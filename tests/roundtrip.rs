//! Roundtrip (write-read) tests for supported LAS versions and attributes.

use std::io::Cursor;

use lasindex::{Header, Point, Reader, Writer};

pub fn roundtrip(header: Header, point: &Point) {
    let mut writer = Writer::new(Cursor::new(Vec::new()), header).unwrap();
    writer.write_point(point.clone()).unwrap();
    let header = writer.header().clone();
    let mut reader = Reader::new(writer.into_inner().unwrap()).unwrap();
    assert_eq!(*point, reader.read_point().unwrap().unwrap());
    assert!(reader.read_point().unwrap().is_none());
    assert_eq!(header, *reader.header());
}

macro_rules! roundtrip_point {
    ($name:ident, $modify_point:expr) => {
        roundtrip_point!($name, $modify_point, |_f| {});
    };
    ($name:ident, $modify_point:expr, $modify_point_format:expr) => {
        #[test]
        fn $name() {
            use lasindex::{Header, Point, point::Format};

            let mut point_format = Format::default();
            $modify_point_format(&mut point_format);
            let mut point = Point::default();
            $modify_point(&mut point);
            let mut header = Header::default();
            header.set_version(super::version()).unwrap();
            header.set_point_format(point_format);
            crate::roundtrip(header, &point);
        }
    };
}

macro_rules! roundtrip_header {
    ($name:ident, $modify_header:expr) => {
        #[test]
        fn $name() {
            use lasindex::{Header, Point};

            let mut header = Header::default();
            header.set_version(super::version()).unwrap();
            $modify_header(&mut header);
            crate::roundtrip(header, &Point::default());
        }
    };
}

macro_rules! version {
    ($name:ident, $major:expr, $minor:expr) => {
        mod $name {
            use lasindex::Version;

            fn version() -> Version {
                Version::new($major, $minor)
            }

            mod point {
                use lasindex::{
                    Color,
                    point::{Classification, ScanDirection},
                };

                roundtrip_point!(xyz, |p: &mut Point| {
                    p.x = 1.;
                    p.y = 2.;
                    p.z = 3.;
                });
                roundtrip_point!(intensity, |p: &mut Point| p.intensity = 42);
                roundtrip_point!(return_number, |p: &mut Point| p.return_number = 2);
                roundtrip_point!(number_of_returns, |p: &mut Point| p.number_of_returns = 2);
                roundtrip_point!(scan_direction, |p: &mut Point| p.scan_direction =
                    ScanDirection::LeftToRight);
                roundtrip_point!(is_edge_of_flight_line, |p: &mut Point| p
                    .is_edge_of_flight_line =
                    true);
                roundtrip_point!(classification, |p: &mut Point| p.classification =
                    Classification::new(Classification::GROUND).unwrap());
                roundtrip_point!(flags, |p: &mut Point| {
                    p.classification.set_synthetic(true);
                    p.classification.set_key_point(true);
                    p.classification.set_withheld(true);
                });
                roundtrip_point!(scan_angle_rank, |p: &mut Point| p.scan_angle_rank = -3);
                roundtrip_point!(user_data, |p: &mut Point| p.user_data = 42);
                roundtrip_point!(point_source_id, |p: &mut Point| p.point_source_id = 42);
                roundtrip_point!(
                    gps_time,
                    |p: &mut Point| p.gps_time = Some(42.),
                    |f: &mut Format| f.has_gps_time = true
                );
                roundtrip_point!(
                    color,
                    |p: &mut Point| p.color = Some(Color {
                        red: 1,
                        green: 2,
                        blue: 3
                    }),
                    |f: &mut Format| f.has_color = true
                );
                roundtrip_point!(
                    gps_time_and_color,
                    |p: &mut Point| {
                        p.gps_time = Some(42.);
                        p.color = Some(Color::new(1, 2, 3));
                    },
                    |f: &mut Format| {
                        f.has_gps_time = true;
                        f.has_color = true;
                    }
                );
                roundtrip_point!(
                    extra_bytes,
                    |p: &mut Point| p.extra_bytes = vec![42],
                    |f: &mut Format| f.extra_bytes = 1
                );
            }

            mod header {
                use chrono::NaiveDate;
                use lasindex::Vlr;
                use uuid::Uuid;

                roundtrip_header!(file_source_id, |h: &mut Header| h.set_file_source_id(42));
                roundtrip_header!(global_encoding, |h: &mut Header| h.set_global_encoding(1));
                roundtrip_header!(guid, |h: &mut Header| h.set_guid(Uuid::from_bytes([42; 16])));
                roundtrip_header!(system_identifier, |h: &mut Header| h
                    .set_system_identifier("roundtrip test")
                    .unwrap());
                roundtrip_header!(generating_software, |h: &mut Header| h
                    .set_generating_software("roundtrip test")
                    .unwrap());
                roundtrip_header!(date, |h: &mut Header| h
                    .set_date(NaiveDate::from_ymd_opt(2017, 10, 30).unwrap())
                    .unwrap());
                roundtrip_header!(transforms, |h: &mut Header| {
                    h.set_scale(0.1, 0.1, 0.1);
                    h.set_offset(-1., -1., -1.);
                });
                roundtrip_header!(vlrs, |h: &mut Header| h.add_vlr(Default::default()));
                roundtrip_header!(projection_vlrs, |h: &mut Header| {
                    h.add_vlr(Vlr {
                        user_id: "LASF_Projection".to_string(),
                        record_id: 34735,
                        data: vec![1, 0, 1, 0, 0, 0, 0, 0],
                        ..Default::default()
                    });
                    h.add_vlr(Vlr {
                        user_id: "LASF_Projection".to_string(),
                        record_id: 34737,
                        data: b"NAD83|\0".to_vec(),
                        ..Default::default()
                    });
                });
                roundtrip_header!(padding, |h: &mut Header| h.set_padding(
                    b"You probably shouldn't do this".to_vec()
                ));
                roundtrip_header!(vlr_padding, |h: &mut Header| h.set_vlr_padding(
                    b"You probably shouldn't do this either".to_vec()
                ));
            }
        }
    };
}

version!(las_1_0, 1, 0);
version!(las_1_1, 1, 1);
version!(las_1_2, 1, 2);
