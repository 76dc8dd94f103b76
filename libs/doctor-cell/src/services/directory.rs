// libs/doctor-cell/src/services/directory.rs
use std::collections::BTreeSet;

use shared_models::{Coordinates, Specialty};

use crate::models::{Doctor, DoctorError, Testimonial};
use crate::services::filter::DoctorFilter;

/// Immutable doctor list, loaded once at startup and shared read-only.
#[derive(Debug, Clone)]
pub struct DoctorDirectory {
    doctors: Vec<Doctor>,
}

impl DoctorDirectory {
    pub fn new(doctors: Vec<Doctor>) -> Self {
        Self { doctors }
    }

    pub fn seeded() -> Self {
        Self::new(seed_doctors())
    }

    pub fn all(&self) -> &[Doctor] {
        &self.doctors
    }

    pub fn get(&self, doctor_id: &str) -> Result<&Doctor, DoctorError> {
        self.doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .ok_or_else(|| DoctorError::NotFound(doctor_id.to_string()))
    }

    pub fn search(&self, filter: &DoctorFilter) -> Vec<Doctor> {
        filter.apply(&self.doctors)
    }

    /// Distinct hospital names, sorted, for the hospital filter control.
    pub fn hospitals(&self) -> Vec<String> {
        self.doctors
            .iter()
            .map(|d| d.hospital.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

fn testimonial(name: &str, comment: &str, rating: u8, date: &str) -> Testimonial {
    Testimonial {
        name: name.to_string(),
        comment: comment.to_string(),
        rating,
        date: date.to_string(),
    }
}

fn seed_doctors() -> Vec<Doctor> {
    vec![
        Doctor {
            id: "1".to_string(),
            name: "Dr. Ahmad Rizal".to_string(),
            specialty: Specialty::Cardiology,
            hospital: "Gleneagles Hospital Kuala Lumpur".to_string(),
            location: "Jalan Ampang, KL".to_string(),
            coords: Some(Coordinates::new(3.1617, 101.7387)),
            rating: 4.9,
            availability: strings(&["Monday", "Tuesday", "Friday"]),
            experience: 15,
            image: "https://images.unsplash.com/photo-1612349317150-e413f6a5b16d?auto=format&fit=crop&q=80&w=400&h=400".to_string(),
            education: strings(&[
                "MBBS, University of Malaya (UM)",
                "Master of Medicine (Internal Medicine), UM",
                "Fellowship in Cardiology, National Heart Institute (IJN)",
            ]),
            affiliations: strings(&[
                "Member of the National Heart Association of Malaysia",
                "Fellow of the American College of Cardiology",
                "Academy of Medicine of Malaysia",
            ]),
            testimonials: vec![
                testimonial("Siti Aminah", "Dr. Ahmad is very professional and explained my heart condition in a way I could easily understand. Highly recommended!", 5, "Jan 2024"),
                testimonial("Robert Tan", "Excellent care during my bypass recovery. The best cardiologist in KL.", 5, "Dec 2023"),
            ],
        },
        Doctor {
            id: "2".to_string(),
            name: "Dr. Sarah Lim".to_string(),
            specialty: Specialty::Dermatology,
            hospital: "Sunway Medical Centre".to_string(),
            location: "Bandar Sunway, Selangor".to_string(),
            coords: Some(Coordinates::new(3.0663, 101.6081)),
            rating: 4.8,
            availability: strings(&["Wednesday", "Thursday", "Saturday"]),
            experience: 10,
            image: "https://images.unsplash.com/photo-1594824476967-48c8b964273f?auto=format&fit=crop&q=80&w=400&h=400".to_string(),
            education: strings(&[
                "MBBS, Monash University Malaysia",
                "MRCP (UK), Royal College of Physicians",
                "Advanced Master in Dermatology, UKM",
            ]),
            affiliations: strings(&[
                "Member of the Malaysian Dermatological Society",
                "International Society of Dermatology",
                "Dermatological Society of Singapore",
            ]),
            testimonials: vec![
                testimonial("Wei Hong", "Finally found a cure for my chronic eczema. Dr. Sarah is miracle worker!", 5, "Feb 2024"),
                testimonial("Lisa K.", "Very gentle and thorough with her skin checks.", 4, "Nov 2023"),
            ],
        },
        Doctor {
            id: "3".to_string(),
            name: "Dr. Kavitha Raj".to_string(),
            specialty: Specialty::Pediatrics,
            hospital: "Pantai Hospital Bangsar".to_string(),
            location: "Bangsar, KL".to_string(),
            coords: Some(Coordinates::new(3.1200, 101.6670)),
            rating: 4.9,
            availability: strings(&["Monday", "Thursday"]),
            experience: 12,
            image: "https://images.unsplash.com/photo-1559839734-2b71f1536783?auto=format&fit=crop&q=80&w=400&h=400".to_string(),
            education: strings(&[
                "MBBS, Kasturba Medical College",
                "Masters in Paediatrics, University of Malaya",
                "Specialist Training in Neonatology, Australia",
            ]),
            affiliations: strings(&[
                "Malaysian Paediatric Association",
                "Royal College of Paediatrics and Child Health (UK)",
                "Perinatal Society of Malaysia",
            ]),
            testimonials: vec![
                testimonial("Mei Ling", "My kids love Dr. Kavitha. She makes them feel so brave!", 5, "Mar 2024"),
                testimonial("Arjun S.", "Very patient with new parents. Answered all our 100 questions.", 5, "Jan 2024"),
            ],
        },
        Doctor {
            id: "4".to_string(),
            name: "Dr. Mohd Faizal".to_string(),
            specialty: Specialty::Orthopedics,
            hospital: "KPJ Damansara Specialist".to_string(),
            location: "Damansara Utama, PJ".to_string(),
            coords: Some(Coordinates::new(3.1364, 101.6237)),
            rating: 4.7,
            availability: strings(&["Tuesday", "Saturday"]),
            experience: 8,
            image: "https://images.unsplash.com/photo-1622253692010-333f2da6031d?auto=format&fit=crop&q=80&w=400&h=400".to_string(),
            education: strings(&[
                "MD, Universiti Kebangsaan Malaysia (UKM)",
                "MS Ortho, Universiti Malaya",
                "Fellowship in Sports Medicine & Arthroplasty, Germany",
            ]),
            affiliations: strings(&[
                "Malaysian Orthopaedic Association (MOA)",
                "International Society of Arthroscopy (ISAKOS)",
                "Academy of Medicine Malaysia",
            ]),
            testimonials: vec![
                testimonial("Johan Ali", "Successful ACL surgery. Back on the football pitch in 6 months!", 5, "Feb 2024"),
                testimonial("Linda T.", "Good doctor, very busy but professional.", 4, "Jan 2024"),
            ],
        },
        Doctor {
            id: "5".to_string(),
            name: "Dr. Jane Wong".to_string(),
            specialty: Specialty::GeneralPractice,
            hospital: "Klinik Kesihatan Bangsar".to_string(),
            location: "Bangsar Baru, KL".to_string(),
            coords: Some(Coordinates::new(3.1296, 101.6735)),
            rating: 4.5,
            availability: strings(&["Monday", "Tuesday", "Wednesday", "Thursday", "Friday"]),
            experience: 20,
            image: "https://images.unsplash.com/photo-1527613426441-4da17471b66d?auto=format&fit=crop&q=80&w=400&h=400".to_string(),
            education: strings(&[
                "MBBS, International Medical University (IMU)",
                "Graduate Diploma in Family Medicine, Academy of Family Physicians of Malaysia",
            ]),
            affiliations: strings(&[
                "Malaysian Medical Association (MMA)",
                "Academy of Family Physicians of Malaysia",
                "World Organization of Family Doctors (WONCA)",
            ]),
            testimonials: vec![
                testimonial("Tan Sri Lee", "Our family doctor for 15 years. Extremely reliable and caring.", 5, "Mar 2024"),
                testimonial("Zul H.", "Short waiting time and effective treatment.", 5, "Oct 2023"),
            ],
        },
    ]
}
