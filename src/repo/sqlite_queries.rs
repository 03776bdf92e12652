pub const QUERY_INSERT_USER: &str = r#"
INSERT INTO users(username,email,password_hash,account_role,created_at)
VALUES($1,$2,$3,$4,$5);
"#;

pub const QUERY_GET_USER_BY_ID: &str = r#"
SELECT id,username,email,account_role,created_at FROM users WHERE id=$1;
"#;

pub const QUERY_GET_USER_BY_EMAIL: &str = r#"
SELECT id,username,email,account_role,created_at FROM users WHERE email=$1;
"#;

pub const QUERY_GET_USER_CREDENTIALS: &str = r#"
SELECT id,username,email,account_role,created_at,password_hash FROM users WHERE email=$1;
"#;

pub const QUERY_GET_ALL_USERS: &str = r#"
SELECT id,username,email,account_role,created_at FROM users ORDER BY id;
"#;

pub const QUERY_INSERT_ANIMAL: &str = r#"
INSERT INTO animals (
    name,species,breed,age,weight,owner_id,created_at,
    image_url,temperature,heart_rate,health_status,last_checkup
) VALUES(
    $1,$2,$3,$4,$5,$6,$7,
    $8,$9,$10,$11,$12
);
"#;

pub const QUERY_UPDATE_ANIMAL: &str = r#"
UPDATE animals SET
    name=$2,species=$3,breed=$4,age=$5,weight=$6,
    image_url=$7,temperature=$8,heart_rate=$9,health_status=$10,last_checkup=$11
WHERE id=$1;
"#;

pub const QUERY_GET_ANIMAL_BY_ID: &str = r#"
SELECT id,name,species,breed,age,weight,owner_id,created_at,image_url,temperature,heart_rate,health_status,last_checkup
FROM animals WHERE id=$1;
"#;

pub const QUERY_GET_ANIMALS_BY_OWNER: &str = r#"
SELECT id,name,species,breed,age,weight,owner_id,created_at,image_url,temperature,heart_rate,health_status,last_checkup
FROM animals WHERE owner_id=$1 ORDER BY id;
"#;

pub const QUERY_GET_ALL_ANIMALS: &str = r#"
SELECT id,name,species,breed,age,weight,owner_id,created_at,image_url,temperature,heart_rate,health_status,last_checkup
FROM animals ORDER BY id;
"#;

pub const QUERY_INSERT_VITAL_SIGN: &str = r#"
INSERT INTO vital_signs (animal_id,kind,value,date,notes) VALUES($1,$2,$3,$4,$5);
"#;

pub const QUERY_GET_VITAL_SIGN_BY_ID: &str = r#"
SELECT id,animal_id,kind,value,date,notes FROM vital_signs WHERE id=$1;
"#;

pub const QUERY_GET_VITAL_SIGNS_BY_ANIMAL: &str = r#"
SELECT id,animal_id,kind,value,date,notes FROM vital_signs WHERE animal_id=$1 ORDER BY id;
"#;

pub const QUERY_GET_VITAL_SIGNS_BY_TYPE: &str = r#"
SELECT id,animal_id,kind,value,date,notes
FROM vital_signs
WHERE animal_id=$1 AND kind=$2
ORDER BY id;
"#;

pub const QUERY_UPDATE_VITAL_SIGN: &str = r#"
UPDATE vital_signs SET value=$2,date=$3,notes=$4 WHERE id=$1;
"#;

pub const QUERY_INSERT_MEDICATION: &str = r#"
INSERT INTO medications (
    animal_id,name,dosage,schedule,start_date,end_date,
    status,last_taken,next_due,notes
) VALUES($1,$2,$3,$4,$5,$6,$7,$8,$9,$10);
"#;

pub const QUERY_UPDATE_MEDICATION: &str = r#"
UPDATE medications SET
    name=$2,dosage=$3,schedule=$4,start_date=$5,end_date=$6,
    status=$7,last_taken=$8,next_due=$9,notes=$10
WHERE id=$1;
"#;

pub const QUERY_GET_MEDICATION_BY_ID: &str = r#"
SELECT id,animal_id,name,dosage,schedule,start_date,end_date,status,last_taken,next_due,notes
FROM medications WHERE id=$1;
"#;

pub const QUERY_GET_MEDICATIONS_BY_ANIMAL: &str = r#"
SELECT id,animal_id,name,dosage,schedule,start_date,end_date,status,last_taken,next_due,notes
FROM medications WHERE animal_id=$1 ORDER BY id;
"#;

pub const QUERY_GET_MEDICATIONS_BY_STATUS: &str = r#"
SELECT id,animal_id,name,dosage,schedule,start_date,end_date,status,last_taken,next_due,notes
FROM medications WHERE status=$1 ORDER BY id;
"#;

pub const QUERY_INSERT_ACTIVITY: &str = r#"
INSERT INTO activities (
    animal_id,kind,description,duration_minutes,intensity,status,timestamp,notes
) VALUES($1,$2,$3,$4,$5,$6,$7,$8);
"#;

pub const QUERY_UPDATE_ACTIVITY: &str = r#"
UPDATE activities SET
    kind=$2,description=$3,duration_minutes=$4,intensity=$5,status=$6,timestamp=$7,notes=$8
WHERE id=$1;
"#;

pub const QUERY_GET_ACTIVITY_BY_ID: &str = r#"
SELECT id,animal_id,kind,description,duration_minutes,intensity,status,timestamp,notes
FROM activities WHERE id=$1;
"#;

pub const QUERY_GET_ACTIVITIES_BY_ANIMAL: &str = r#"
SELECT id,animal_id,kind,description,duration_minutes,intensity,status,timestamp,notes
FROM activities WHERE animal_id=$1 ORDER BY id;
"#;

pub const QUERY_GET_ACTIVITIES_BY_STATUS: &str = r#"
SELECT id,animal_id,kind,description,duration_minutes,intensity,status,timestamp,notes
FROM activities WHERE status=$1 ORDER BY id;
"#;
